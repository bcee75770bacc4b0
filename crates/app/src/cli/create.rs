use clap::Args;
use pixelphraser::staging::{NewStagingRecord, ProductId, StagingStore};
use pixelphraser_app::context::AppContext;

#[derive(Debug, Args)]
pub(crate) struct CreateArgs {
    /// Product the description is generated for
    #[arg(long)]
    product_id: String,

    /// Product image the description was generated from
    #[arg(long)]
    image_url: String,

    /// Product display name
    #[arg(long)]
    product_name: String,

    /// Product type name
    #[arg(long)]
    product_type: String,
}

pub(crate) async fn run(args: CreateArgs, context: &AppContext) -> Result<(), String> {
    let record = context
        .store
        .create(NewStagingRecord {
            product_id: ProductId::new(args.product_id),
            image_url: args.image_url,
            product_name: args.product_name,
            product_type: args.product_type,
        })
        .await
        .map_err(|error| format!("failed to stage description: {error}"))?;

    println!("record_id: {}", record.id);
    println!("product_id: {}", record.key);
    println!("version: {}", record.version);

    Ok(())
}
