use chrono_tz::Tz;
use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "finbot={level},telegram_bot={level},engine={level},migration={level}",
            level = settings.app.level
        ))
        .init();

    let telegram = settings.telegram;
    let timezone: Tz = match telegram.timezone.parse() {
        Ok(tz) => tz,
        Err(err) => {
            tracing::error!("invalid timezone {}: {err}", telegram.timezone);
            return Err(err.to_string().into());
        }
    };

    let db = match parse_database(&settings.database).await {
        Ok(db) => db,
        Err(err) => {
            tracing::error!("failed to initialize database: {err}");
            return Err(err);
        }
    };

    let ledger = match engine::Ledger::builder().database(db).build().await {
        Ok(ledger) => ledger,
        Err(err) => {
            tracing::error!("failed to build ledger from database: {err}");
            return Err(err.into());
        }
    };

    let bot = match telegram_bot::Bot::builder()
        .token(&telegram.token)
        .allowed_users(telegram.allowed_users)
        .timezone(timezone)
        .list_limit(telegram.list_limit)
        .ledger(ledger)
        .build()
    {
        Ok(bot) => bot,
        Err(err) => {
            tracing::error!("failed to initialize telegram bot: {err}");
            return Err(err.into());
        }
    };

    bot.run().await;
    Ok(())
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    tracing::info!("database ready");
    Ok(database)
}
