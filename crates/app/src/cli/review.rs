use std::io::{self, Write};

use pixelphraser::{
    moderation::ModerationOutcome,
    queue::{ModerationQueue, QueueError, expanded_text, format_generated_at},
};
use pixelphraser_app::context::AppContext;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

const PROMPT: &str = "[a]ccept [r]eject [s]kip [v]iew image [q]uit > ";

pub(crate) async fn run(context: &AppContext) -> Result<(), String> {
    let queue = super::loaded_queue(context).await?;

    review(&queue, BufReader::new(tokio::io::stdin()), io::stdout().lock())
        .await
        .map_err(|error| format!("review failed: {error}"))
}

/// Walk the loaded snapshot oldest first, reading one command per line.
async fn review<R, W>(queue: &ModerationQueue, input: R, mut out: W) -> Result<(), QueueError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let records = queue.records();

    if records.is_empty() {
        writeln!(out, "No descriptions awaiting moderation")?;
        return Ok(());
    }

    for (position, record) in records.iter().enumerate() {
        writeln!(
            out,
            "\n[{}/{}] {} ({}, {})",
            position + 1,
            records.len(),
            record.value.product_name,
            record.key,
            format_generated_at(record.generated_at)
        )?;
        writeln!(out, "{}", expanded_text(record))?;

        loop {
            write!(out, "{PROMPT}")?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                writeln!(out)?;
                return Ok(());
            };

            let result = match line.trim() {
                "a" => queue.accept(&record.id).await,
                "r" => queue.reject(&record.id).await,
                "s" => break,
                "v" => {
                    writeln!(out, "{}", record.value.image_url)?;
                    continue;
                }
                "q" => return Ok(()),
                other => {
                    writeln!(out, "unknown command {other:?}")?;
                    continue;
                }
            };

            report(queue, &result, &mut out)?;
            break;
        }
    }

    writeln!(out, "\nEnd of queue")?;

    Ok(())
}

fn report(
    queue: &ModerationQueue,
    result: &Result<ModerationOutcome, QueueError>,
    out: &mut impl Write,
) -> io::Result<()> {
    match result {
        Ok(_) => {
            if let Some(notice) = queue.take_notice() {
                writeln!(out, "{notice}")?;
            }
        }
        Err(QueueError::Moderation(error)) => {
            let message = queue.error().unwrap_or_else(|| error.to_string());

            queue.dismiss_error();
            writeln!(out, "{message}")?;
        }
        Err(error) => writeln!(out, "{error}")?,
    }

    Ok(())
}
