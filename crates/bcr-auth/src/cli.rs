//! CLI module for bcr-auth.
//!
//! Manages accounts in an SQL store directly, applying the same validation
//! and password hashing as the HTTP service. It can be used either as a
//! standalone binary or as a subcommand of the main bcr CLI.
//!
//! # Usage
//!
//! ```bash
//! # Initialize database schema
//! bcr-auth init -d sqlite:users.db
//!
//! # Add a user
//! bcr-auth add -d sqlite:users.db -u alice -p Secret123 -e alice@example.com
//!
//! # List all users
//! bcr-auth list -d sqlite:users.db
//!
//! # Remove a user
//! bcr-auth remove -d sqlite:users.db -u alice
//! ```
//!
//! Accounts changed here bypass the service's cache; cached copies expire
//! with their TTL.

use bcr_core::DEFAULT_BCRYPT_COST;
use clap::{Parser, Subcommand};
use tabled::{Table, Tabled};

use crate::hash::PasswordCodec;
use crate::record::{NewUser, UserRecord};
use crate::sql::{SqlStore, SqlStoreConfig};
use crate::store::UserStore;
use crate::validate::validate_new_user;

/// bcr account management CLI arguments.
#[derive(Parser, Debug, Clone)]
#[command(name = "bcr-auth", version, about = "Manage bcr user accounts")]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommands,
}

/// Auth CLI subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum AuthCommands {
    /// Initialize database schema.
    Init {
        /// Database connection URL.
        #[arg(short, long, env = "BCR_STORE_URL")]
        database: String,
    },

    /// Add a new user.
    Add {
        /// Database connection URL.
        #[arg(short, long, env = "BCR_STORE_URL")]
        database: String,

        /// Username (3-20 characters of [A-Za-z0-9_-]).
        #[arg(short, long)]
        username: String,

        /// User password.
        #[arg(short, long)]
        password: String,

        /// Email address.
        #[arg(short, long)]
        email: String,

        /// Category code (0-3); defaults to 2.
        #[arg(short, long)]
        category: Option<i32>,

        /// bcrypt cost factor.
        #[arg(long, default_value_t = DEFAULT_BCRYPT_COST)]
        cost: u32,
    },

    /// Remove a user.
    Remove {
        /// Database connection URL.
        #[arg(short, long, env = "BCR_STORE_URL")]
        database: String,

        /// Username to remove.
        #[arg(short, long)]
        username: String,
    },

    /// List all users.
    List {
        /// Database connection URL.
        #[arg(short, long, env = "BCR_STORE_URL")]
        database: String,

        /// Output format (table, json, csv).
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Show a bcrypt hash (for manual provisioning).
    Hash {
        /// Password to hash.
        password: String,

        /// bcrypt cost factor.
        #[arg(long, default_value_t = DEFAULT_BCRYPT_COST)]
        cost: u32,
    },
}

/// User row for display.
#[derive(Tabled)]
struct UserDisplay {
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Category")]
    category: String,
}

impl From<&UserRecord> for UserDisplay {
    fn from(record: &UserRecord) -> Self {
        Self {
            username: record.username.clone(),
            email: if record.email.is_empty() {
                "-".to_string()
            } else {
                record.email.clone()
            },
            category: format!("{} ({})", record.category, record.category.code()),
        }
    }
}

/// Run the auth CLI with the given arguments.
///
/// This is the main entry point for the auth CLI, used by both the
/// standalone binary and the unified bcr CLI.
pub async fn run(args: AuthArgs) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        AuthCommands::Init { database } => init_database(&database).await,
        AuthCommands::Add {
            database,
            username,
            password,
            email,
            category,
            cost,
        } => {
            let user = NewUser::new(username, password, email, category);
            add_user(&database, &user, cost).await
        }
        AuthCommands::Remove { database, username } => remove_user(&database, &username).await,
        AuthCommands::List { database, format } => list_users(&database, &format).await,
        AuthCommands::Hash { password, cost } => {
            println!("{}", PasswordCodec::new(cost)?.hash(&password)?);
            Ok(())
        }
    }
}

/// Connect to database.
async fn connect(url: &str) -> Result<SqlStore, Box<dyn std::error::Error>> {
    let store = SqlStore::connect(SqlStoreConfig::new(url).max_connections(1)).await?;
    Ok(store)
}

/// Initialize database schema.
async fn init_database(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    connect(url).await?.init_schema().await?;
    println!("Database schema initialized successfully.");
    Ok(())
}

/// Add a new user.
async fn add_user(url: &str, user: &NewUser, cost: u32) -> Result<(), Box<dyn std::error::Error>> {
    let category = validate_new_user(user)?;
    let codec = PasswordCodec::new(cost)?;
    let record = UserRecord {
        username: user.username.clone(),
        password_hash: codec.hash_blocking(&user.password).await?,
        email: user.email.clone(),
        category,
    };

    let store = connect(url).await?;
    store.add_user(&record).await?;

    println!("User added successfully.");
    println!("  Username: {}", record.username);
    println!("  Email: {}", record.email);
    println!("  Category: {}", record.category);
    Ok(())
}

/// Remove a user.
async fn remove_user(url: &str, username: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = connect(url).await?;
    match store.delete_user(username).await {
        Ok(()) => println!("User removed successfully."),
        Err(crate::AuthError::NotFound) => println!("No user found with username: {username}"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// List all users.
async fn list_users(url: &str, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = connect(url).await?;
    let users = store.list_users().await?;

    if users.is_empty() {
        println!("No users found.");
        return Ok(());
    }

    print!("{}", render_users(&users, format)?);
    Ok(())
}

fn render_users(users: &[UserRecord], format: &str) -> Result<String, Box<dyn std::error::Error>> {
    let out = match format {
        "json" => {
            let profiles: Vec<_> = users.iter().map(UserRecord::profile).collect();
            format!("{}\n", serde_json::to_string_pretty(&profiles)?)
        }
        "csv" => {
            let mut out = String::from("username,email,category\n");
            for user in users {
                out.push_str(&format!(
                    "{},{},{}\n",
                    user.username,
                    user.email,
                    user.category.code()
                ));
            }
            out
        }
        _ => {
            // Table format (default)
            let rows: Vec<UserDisplay> = users.iter().map(UserDisplay::from).collect();
            format!("{}\n", Table::new(rows))
        }
    };
    Ok(out)
}
