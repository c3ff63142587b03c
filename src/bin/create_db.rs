use tokio_postgres::{Client, NoTls};

async fn database_exists(client: &Client, name: &str) -> Result<bool, tokio_postgres::Error> {
    let row = client
        .query_opt("SELECT 1 FROM pg_database WHERE datname = $1", &[&name])
        .await?;
    Ok(row.is_some())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let conn_str = std::env::var("PG_ADMIN_CONN")
        .unwrap_or_else(|_| "host=127.0.0.1 user=postgres dbname=postgres".into());
    let db_name = std::env::var("DB_NAME").unwrap_or_else(|_| "localbiz_discovery".into());

    println!("Connecting to Postgres to set up '{}'...", db_name);

    let (client, connection) = tokio_postgres::connect(&conn_str, NoTls).await?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("connection error: {}", e);
        }
    });

    if database_exists(&client, &db_name).await? {
        println!("Database '{}' already exists.", db_name);
        return Ok(());
    }

    // Identifier can't be a bind parameter, so only accept safe names.
    if !db_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        eprintln!("Refusing to create database: invalid name '{}'.", db_name);
        return Ok(());
    }

    client
        .execute(format!("CREATE DATABASE \"{}\"", db_name).as_str(), &[])
        .await?;
    println!("Database '{}' created successfully.", db_name);

    Ok(())
}
