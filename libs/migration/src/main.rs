//! Schema CLI for the shop database.
//!
//! `cargo run -p migration -- up` applies pending migrations against `DATABASE_URL`;
//! `status`, `down` and `fresh` are available as well.

#[tokio::main]
async fn main() {
    sea_orm_migration::cli::run_cli(migration::Migrator).await;
}
