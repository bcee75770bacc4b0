use std::io;

use pixelphraser_app::context::AppContext;

pub(crate) async fn run(context: &AppContext) -> Result<(), String> {
    let queue = super::loaded_queue(context).await?;

    queue
        .write_to(io::stdout().lock())
        .map_err(|error| format!("failed to print queue: {error}"))
}
