//! Queue rendering

use std::io;

use jiff::Timestamp;
use tabled::{
    builder::Builder,
    settings::{Color, Style, object::Rows},
};

use crate::{
    locales::Locale,
    queue::{ModerationQueue, QueueError},
    staging::StagingRecord,
};

const SUMMARY_WIDTH: usize = 40;
const UNSET: &str = "N/A";

/// Full multi-locale text of a record, one `LABEL: text` line per locale.
#[must_use]
pub fn expanded_text(record: &StagingRecord) -> String {
    Locale::ALL
        .iter()
        .map(|locale| {
            format!(
                "{}: {}",
                locale.label(),
                record.value.descriptions.get(*locale).unwrap_or(UNSET)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Display form of a record's creation time, in UTC.
#[must_use]
pub fn format_generated_at(generated_at: Timestamp) -> String {
    generated_at.strftime("%Y-%m-%d %H:%M").to_string()
}

fn summary_text(record: &StagingRecord) -> String {
    Locale::ALL
        .iter()
        .map(|locale| {
            let text = record.value.descriptions.get(*locale).unwrap_or(UNSET);

            format!("{}: {}", locale.label(), truncate(text, SUMMARY_WIDTH))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }

    let mut truncated: String = text.chars().take(width.saturating_sub(1)).collect();

    truncated.push('…');
    truncated
}

impl ModerationQueue {
    /// Render the snapshot as a table, followed by the current error and
    /// notice.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Io`] if writing to `out` fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), QueueError> {
        let state = self.lock();

        if state.records.is_empty() {
            writeln!(out, "No descriptions awaiting moderation")?;
        } else {
            let mut builder = Builder::default();

            builder.push_record([
                "#",
                "Image",
                "Product Name",
                "Descriptions",
                "Generated At",
                "Actions",
            ]);

            for (row, record) in state.records.iter().enumerate() {
                let actions = match &state.processing {
                    Some(active) if *active == record.id => "processing…",
                    Some(_) => "unavailable",
                    None => "[accept] [reject]",
                };

                builder.push_record([
                    (row + 1).to_string(),
                    record.value.image_url.clone(),
                    record.value.product_name.clone(),
                    summary_text(record),
                    format_generated_at(record.generated_at),
                    actions.to_string(),
                ]);
            }

            let mut table = builder.build();

            table.with(Style::modern_rounded());
            table.modify(Rows::first(), Color::BOLD);

            writeln!(out, "{table}")?;
        }

        if let Some(error) = &state.error {
            writeln!(out, "error: {error}")?;
        }

        if let Some(notice) = &state.notice {
            writeln!(out, "{notice}")?;
        }

        Ok(())
    }
}
