use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::adapters::game_results_sea;
use crate::error::AppError;

/// Connect to the results database and make sure the `game_results` table
/// exists.
pub async fn connect_db(database_url: &str) -> Result<DatabaseConnection, AppError> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options.sqlx_logging(false);

    let conn = Database::connect(options).await?;
    game_results_sea::ensure_table(&conn).await?;
    info!("Results database ready");
    Ok(conn)
}
