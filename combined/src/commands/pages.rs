//! Pages command.

use common::{config::AppConfig, AppResult};
use module_service_lib::service::PageService;

use super::Context;
use crate::cli::args::{PagesAction, PagesArgs};

pub async fn execute(args: PagesArgs, config: AppConfig) -> AppResult<()> {
    let ctx = Context::connect(&config).await?;

    match args.action {
        PagesAction::List => {
            for page in ctx.modules.pages.list().await? {
                let slug = if page.is_home() { "/" } else { page.slug.as_str() };
                println!("{:>4} {:<32} {:<10} {}", page.id, slug, page.status, page.title);
            }
        }
    }

    Ok(())
}
