/********************************************************************************
 * Copyright (c) 2024 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

use super::RecordSerializer;
use crate::error::{Error, Result};
use crate::record::LogRecord;
use chrono::SecondsFormat;

pub const DEFAULT_TEMPLATE: &str = "{date} [{type}] {context} | {source} | {description}";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Placeholder {
    Id,
    Type,
    Context,
    Source,
    Description,
    Date,
    Tags,
    Items,
}

impl Placeholder {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "id" => Some(Self::Id),
            "type" => Some(Self::Type),
            "context" => Some(Self::Context),
            "source" => Some(Self::Source),
            "description" => Some(Self::Description),
            "date" => Some(Self::Date),
            "tags" => Some(Self::Tags),
            "items" => Some(Self::Items),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Segment {
    Literal(String),
    Field(Placeholder),
}

/// Renders each record through a `{placeholder}` template.
///
/// Known placeholders: `id`, `type`, `context`, `source`, `description`, `date` (RFC 3339,
/// UTC), `tags` (comma separated) and `items` (`name=value` pairs, string values
/// unquoted). Unknown placeholders are copied verbatim; absent optional fields render as
/// empty text.
///
/// In extended mode `tags` and `items` are written as JSON instead: `["a","b"]` and
/// `[{"name":"attempt","value":3}]`.
#[derive(Clone, Debug)]
pub struct TemplateRecordSerializer {
    template: String,
    segments: Vec<Segment>,
    extended: bool,
}

impl TemplateRecordSerializer {
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let segments = Self::parse(&template);
        Self {
            template,
            segments,
            extended: false,
        }
    }

    /// Same placeholders as [`TemplateRecordSerializer::new`], collections rendered as JSON.
    pub fn extended(template: impl Into<String>) -> Self {
        Self {
            extended: true,
            ..Self::new(template)
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn is_extended(&self) -> bool {
        self.extended
    }

    fn parse(template: &str) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            literal.push_str(&rest[..open]);
            let after_open = &rest[open + 1..];
            match after_open.find('}') {
                Some(close) => {
                    let name = &after_open[..close];
                    match Placeholder::parse(name) {
                        Some(placeholder) => {
                            if !literal.is_empty() {
                                segments.push(Segment::Literal(std::mem::take(&mut literal)));
                            }
                            segments.push(Segment::Field(placeholder));
                        }
                        None => {
                            literal.push('{');
                            literal.push_str(name);
                            literal.push('}');
                        }
                    }
                    rest = &after_open[close + 1..];
                }
                None => {
                    literal.push_str(&rest[open..]);
                    rest = "";
                }
            }
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        segments
    }

    fn render_field(
        &self,
        placeholder: Placeholder,
        record: &LogRecord,
        out: &mut String,
    ) -> Result<()> {
        match placeholder {
            Placeholder::Id => out.push_str(&record.id),
            Placeholder::Type => out.push_str(record.log_type.as_str()),
            Placeholder::Context => out.push_str(record.context.as_deref().unwrap_or_default()),
            Placeholder::Source => out.push_str(record.source.as_deref().unwrap_or_default()),
            Placeholder::Description => {
                out.push_str(record.description.as_deref().unwrap_or_default())
            }
            Placeholder::Date => {
                out.push_str(&record.date.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Placeholder::Tags if self.extended => {
                out.push_str(&serde_json::to_string(&record.tags).map_err(Error::serialization)?)
            }
            Placeholder::Tags => out.push_str(&record.tags.join(",")),
            Placeholder::Items if self.extended => {
                out.push_str(&serde_json::to_string(&record.items).map_err(Error::serialization)?)
            }
            Placeholder::Items => {
                let items: Vec<String> = record
                    .items
                    .iter()
                    .map(|item| match &item.value {
                        serde_json::Value::String(text) => format!("{}={}", item.name, text),
                        value => format!("{}={}", item.name, value),
                    })
                    .collect();
                out.push_str(&items.join(" "));
            }
        }
        Ok(())
    }
}

impl Default for TemplateRecordSerializer {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

impl RecordSerializer for TemplateRecordSerializer {
    fn serialize(&self, record: &LogRecord) -> Result<Option<String>> {
        let mut out = String::with_capacity(self.template.len() + 64);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(placeholder) => self.render_field(*placeholder, record, &mut out)?,
            }
        }
        Ok(Some(out))
    }
}

#[cfg(test)]
mod tests {
    use super::{TemplateRecordSerializer, DEFAULT_TEMPLATE};
    use crate::record::{LogItem, LogRecord, LogType};
    use crate::serializer::RecordSerializer;
    use chrono::{TimeZone, Utc};

    fn record() -> LogRecord {
        LogRecord::new(LogType::Error, "payment declined")
            .with_id("7")
            .with_context("billing")
            .with_tag("card")
            .with_tag("retry")
            .with_item(LogItem::new("attempt", 3))
            .with_date(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap())
    }

    fn render(template: &str) -> String {
        TemplateRecordSerializer::new(template)
            .serialize(&record())
            .expect("template rendering never fails")
            .expect("text should be present")
    }

    #[test]
    fn default_template_renders_all_core_fields() {
        let text = TemplateRecordSerializer::default()
            .serialize(&record())
            .expect("no error")
            .expect("text");

        assert_eq!(
            text,
            "2024-03-01T12:30:00.000Z [Error] billing |  | payment declined"
        );
    }

    #[test]
    fn renders_tags_and_items() {
        assert_eq!(render("{id}: {tags} / {items}"), "7: card,retry / attempt=3");
    }

    #[test]
    fn string_item_values_are_unquoted() {
        let record = record()
            .with_item(LogItem::new("key", "user:17"))
            .with_item(LogItem::new("cached", false));

        let text = TemplateRecordSerializer::new("{items}")
            .serialize(&record)
            .expect("no error")
            .expect("text");

        assert_eq!(text, "attempt=3 key=user:17 cached=false");
    }

    #[test]
    fn extended_mode_writes_collections_as_json() {
        let serializer = TemplateRecordSerializer::extended("{type} {tags} {items}");

        let text = serializer
            .serialize(&record().with_item(LogItem::new("key", "user:17")))
            .expect("no error")
            .expect("text");

        assert!(serializer.is_extended());
        assert_eq!(
            text,
            r#"Error ["card","retry"] [{"name":"attempt","value":3},{"name":"key","value":"user:17"}]"#
        );
    }

    #[test]
    fn extended_mode_keeps_scalar_placeholders() {
        let text = TemplateRecordSerializer::extended(DEFAULT_TEMPLATE)
            .serialize(&record())
            .expect("no error")
            .expect("text");

        assert_eq!(
            text,
            "2024-03-01T12:30:00.000Z [Error] billing |  | payment declined"
        );
    }

    #[test]
    fn unknown_placeholders_are_literal() {
        assert_eq!(render("{host} {type}"), "{host} Error");
    }

    #[test]
    fn unterminated_brace_is_literal() {
        assert_eq!(render("{type} {desc"), "Error {desc");
    }

    #[test]
    fn template_without_placeholders_is_copied() {
        assert_eq!(render("static line"), "static line");
    }
}
