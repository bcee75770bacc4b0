use clap::Args;
use pixelphraser::{moderation::ModerationAction, queue::QueueError};
use pixelphraser_app::context::AppContext;

#[derive(Debug, Args)]
pub(crate) struct ModerateArgs {
    /// Product whose pending description should be moderated
    product_id: String,
}

pub(crate) async fn run(
    action: ModerationAction,
    args: ModerateArgs,
    context: &AppContext,
) -> Result<(), String> {
    let queue = super::loaded_queue(context).await?;
    let product_id = super::product_id(&args.product_id);

    let record = queue
        .find(&product_id)
        .ok_or_else(|| format!("no pending description for product {product_id}"))?;

    let result = match action {
        ModerationAction::Accept => queue.accept(&record.id).await,
        ModerationAction::Reject => queue.reject(&record.id).await,
    };

    match result {
        Ok(_) => {
            if let Some(notice) = queue.take_notice() {
                println!("{notice}");
            }

            Ok(())
        }
        Err(QueueError::Moderation(error)) => {
            Err(queue.error().unwrap_or_else(|| error.to_string()))
        }
        Err(error) => Err(error.to_string()),
    }
}
