//! Dashboard example: invoice forms and credential sign-in over HTTP
//!
//! Uses PostgreSQL when built with `--features postgres` and `POSTGRES_URL`
//! is set, in-memory storage otherwise.
//!
//! ```text
//! curl -i -d 'customerId=cust-1&amount=12.34&status=pending' localhost:3000/dashboard/invoices
//! curl -i -d 'email=user@nextmail.com&password=123456' localhost:3000/login
//! ```

use invoices::config::logging::init_logging;
use invoices::prelude::*;

const DEMO_EMAIL: &str = "user@nextmail.com";
const DEMO_PASSWORD: &str = "123456";

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    let config = AppConfig::from_env();
    let user = User::new("User", DEMO_EMAIL, DEMO_PASSWORD)?;

    let builder = ServerBuilder::new().with_routes(config.routes.clone());

    #[cfg(feature = "postgres")]
    let builder = if config.database.url.is_some() {
        use invoices::storage::postgres::{connect, ensure_schema};

        let pool = connect(&config.database).await?;
        ensure_schema(&pool).await?;

        let users = PostgresUserStore::new(pool.clone());
        users.upsert(&user).await?;

        builder
            .with_invoice_service(PostgresInvoiceService::new(pool))
            .with_credentials_provider(UserStoreCredentialsProvider::new(users))
    } else {
        in_memory(builder, user).await?
    };

    #[cfg(not(feature = "postgres"))]
    let builder = in_memory(builder, user).await?;

    println!("Invoice dashboard listening on http://{}", config.server.bind);
    println!("  GET  {}", config.routes.invoices);
    println!("  POST {}", config.routes.invoices);
    println!("  POST {}/{{id}}/edit", config.routes.invoices);
    println!("  POST {}/{{id}}/delete", config.routes.invoices);
    println!("  POST /login  ({} / {})", DEMO_EMAIL, DEMO_PASSWORD);

    builder.serve(&config.server.bind).await
}

/// Seed an in-memory store with the demo user and two invoices
async fn in_memory(builder: ServerBuilder, user: User) -> Result<ServerBuilder> {
    let users = InMemoryUserStore::new();
    users.add(user)?;

    let service = InMemoryInvoiceService::new();
    service
        .insert(NewInvoice {
            customer_id: "cust-1".into(),
            amount: 15795,
            status: InvoiceStatus::Pending,
            date: NaiveDate::from_ymd_opt(2022, 12, 6).unwrap_or_default(),
        })
        .await?;
    service
        .insert(NewInvoice {
            customer_id: "cust-2".into(),
            amount: 20348,
            status: InvoiceStatus::Paid,
            date: NaiveDate::from_ymd_opt(2022, 11, 14).unwrap_or_default(),
        })
        .await?;

    Ok(builder
        .with_invoice_service(service)
        .with_credentials_provider(UserStoreCredentialsProvider::new(users)))
}
