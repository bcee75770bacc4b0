use clap::Args;
use pixelphraser::{
    queue::{expanded_text, format_generated_at},
    staging::StagingStore,
};
use pixelphraser_app::context::AppContext;

#[derive(Debug, Args)]
pub(crate) struct ShowArgs {
    /// Product whose pending description should be shown
    product_id: String,
}

pub(crate) async fn run(args: ShowArgs, context: &AppContext) -> Result<(), String> {
    let product_id = super::product_id(&args.product_id);

    let record = context
        .store
        .get(&product_id)
        .await
        .map_err(|error| format!("failed to fetch description: {error}"))?
        .ok_or_else(|| format!("no pending description for product {product_id}"))?;

    println!("product_id: {}", record.key);
    println!("product_name: {}", record.value.product_name);
    println!("product_type: {}", record.value.product_type);
    println!("image_url: {}", record.value.image_url);
    println!("generated_at: {}", format_generated_at(record.generated_at));
    println!("version: {}", record.version);
    println!();
    println!("{}", expanded_text(&record));

    Ok(())
}
