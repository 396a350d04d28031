//! CLI administration tool for travelgo.
//!
//! Manages users, sample data, session tokens and the listing cache without
//! going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create an admin (prompts for missing values)
//! cargo run --bin admin -- user create --admin
//!
//! # Load the sample users and posts
//! cargo run --bin admin -- seed
//!
//! # Issue a bearer token for user 1
//! cargo run --bin admin -- token issue 1
//!
//! # Sign in as the operator for later commands (prompts for the password)
//! cargo run --bin admin -- session login --email sarah@example.com
//!
//! # Look at the cached "latest" listing
//! cargo run --bin admin -- cache inspect latest
//! ```
//!
//! # Environment Variables
//!
//! Same as the server (see `travelgo::config`); `SESSION_SECRET` must match
//! the server's for issued tokens to be accepted.

use travelgo::application::services::{RegisterUser, SessionService, UserService};
use travelgo::config::{self, Config};
use travelgo::domain::entities::{NewPost, Role, User};
use travelgo::infrastructure::cache::{CacheService, CacheSlot, slots};
use travelgo::server::{Storage, connect_cache, connect_storage};
use travelgo::session_context::{FileSessionStore, SessionContext};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use std::sync::Arc;

/// CLI tool for managing travelgo.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Create the sample users and posts (skips users that already exist)
    Seed,

    /// Issue session tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Manage the operator session stored on this machine
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Inspect or clear the listing cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a user; an existing email is promoted when --admin is given
    Create {
        #[arg(short, long)]
        username: Option<String>,

        #[arg(short, long)]
        full_name: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        /// Generated and printed when omitted
        #[arg(short, long)]
        password: Option<String>,

        #[arg(long)]
        admin: bool,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all users
    List,
}

#[derive(Subcommand)]
enum TokenAction {
    /// Print a bearer token for a user
    Issue { user_id: i64 },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Check credentials, then store a token as the operator session
    Login {
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Show the stored session
    Show,
    /// Forget the stored session
    Clear,
}

#[derive(Subcommand)]
enum CacheAction {
    /// Print one slot: all, featured or latest
    Inspect { slot: String },
    /// Delete every listing slot
    Clear,
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &config).await?,
        Commands::Seed => seed(&config).await?,
        Commands::Token { action } => handle_token_action(action, &config).await?,
        Commands::Session { action } => handle_session_action(action, &config).await?,
        Commands::Cache { action } => handle_cache_action(action, &config).await?,
        Commands::Db { action } => handle_db_action(action, &config).await?,
    }

    Ok(())
}

fn session_service(config: &Config) -> SessionService {
    SessionService::new(config.session_secret.clone(), config.session_ttl_seconds)
}

async fn user_service(config: &Config) -> Result<(Storage, UserService)> {
    let storage = connect_storage(config).await?;
    let users = UserService::new(storage.users.clone());
    Ok((storage, users))
}

/// Dispatches user management commands.
async fn handle_user_action(action: UserAction, config: &Config) -> Result<()> {
    let (_, users) = user_service(config).await?;

    match action {
        UserAction::Create {
            username,
            full_name,
            email,
            password,
            admin,
            yes,
        } => create_user(&users, username, full_name, email, password, admin, yes).await,
        UserAction::List => list_users(&users).await,
    }
}

/// Creates a user with interactive prompts for missing values.
async fn create_user(
    users: &UserService,
    username: Option<String>,
    full_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    admin: bool,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "👤 Create User".bright_blue().bold());
    println!();

    let username = match username {
        Some(u) => u,
        None => Input::new().with_prompt("Username").interact_text()?,
    };
    let full_name = match full_name {
        Some(n) => n,
        None => Input::new().with_prompt("Full name").interact_text()?,
    };
    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };

    let (password, generated) = match password {
        Some(p) => (p, false),
        None if skip_confirm => (generate_password(), true),
        None => {
            let typed: String = Password::new()
                .with_prompt("Password (leave empty to generate)")
                .allow_empty_password(true)
                .interact()?;
            if typed.is_empty() {
                (generate_password(), true)
            } else {
                (typed, false)
            }
        }
    };

    let role = if admin { Role::Admin } else { Role::User };

    println!();
    println!("  Username: {}", username.cyan());
    println!("  Email:    {}", email.cyan());
    println!("  Role:     {}", role.to_string().cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this user?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let input = RegisterUser {
        username,
        full_name,
        email,
        password: password.clone(),
        role,
    };

    let user = if admin {
        let (user, created) = users
            .ensure_admin(input)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create admin: {}", e))?;
        if !created {
            println!("{}", "⚠️  Email already registered, promoted to admin".yellow());
        }
        user
    } else {
        users
            .register(input)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?
    };

    println!();
    println!(
        "{} {}",
        "✅ User saved with id".green().bold(),
        user.id.to_string().bright_white().bold()
    );
    if generated {
        println!();
        println!("  Password: {}", password.bright_yellow().bold());
        println!(
            "{}",
            "⚠️  Save this password now! It is not stored anywhere in clear text."
                .red()
                .bold()
        );
    }
    println!();

    Ok(())
}

/// Lists all users.
async fn list_users(users: &UserService) -> Result<()> {
    println!("{}", "📋 Users".bright_blue().bold());
    println!();

    let all = users
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if all.is_empty() {
        println!("{}", "  No users found".yellow());
        println!();
        println!(
            "  Create one with: {} admin user create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<4} {:<20} {:<28} {:<6} {:<6}",
        "ID".bright_white().bold(),
        "Username".bright_white().bold(),
        "Email".bright_white().bold(),
        "Role".bright_white().bold(),
        "Posts".bright_white().bold()
    );
    println!("  {}", "─".repeat(70).bright_black());

    for user in &all {
        let role = match user.role {
            Role::Admin => "admin".magenta(),
            Role::User => "user".normal(),
        };

        println!(
            "  {:<4} {:<20} {:<28} {:<6} {}",
            user.id.to_string().bright_black(),
            user.username.cyan(),
            user.email,
            role,
            user.post_ids.len()
        );
    }

    println!();
    println!("  Total: {}", all.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

struct SamplePost {
    title: &'static str,
    image_link: &'static str,
    categories: &'static [&'static str],
    description: &'static str,
    featured: bool,
}

struct SampleUser {
    username: &'static str,
    full_name: &'static str,
    email: &'static str,
    posts: &'static [SamplePost],
}

const SAMPLE_PASSWORD: &str = "Password123!";

const SAMPLE_USERS: &[SampleUser] = &[
    SampleUser {
        username: "sarah_travels",
        full_name: "Sarah Jenkins",
        email: "sarah@example.com",
        posts: &[
            SamplePost {
                title: "Sunset in Santorini",
                image_link: "https://images.unsplash.com/photo-1570077188670-e3a8d69ac5ff",
                categories: &["Travel", "Beaches"],
                description: "The most beautiful sunset I have ever seen.",
                featured: true,
            },
            SamplePost {
                title: "Hiking the Alps",
                image_link: "https://images.unsplash.com/photo-1464822759023-fed622ff2c3b",
                categories: &["Adventure", "Nature"],
                description: "A challenging but rewarding hike.",
                featured: false,
            },
        ],
    },
    SampleUser {
        username: "mike_explorer",
        full_name: "Mike Anderson",
        email: "mike@example.com",
        posts: &[SamplePost {
            title: "Urban Jungle: Tokyo",
            image_link: "https://images.unsplash.com/photo-1540959733332-eab4deabeeaf",
            categories: &["City", "Travel"],
            description: "Lost in the neon lights of Tokyo.",
            featured: true,
        }],
    },
    SampleUser {
        username: "emily_nature",
        full_name: "Emily Chen",
        email: "emily@example.com",
        posts: &[
            SamplePost {
                title: "Hidden Waterfall",
                image_link: "https://images.unsplash.com/photo-1432405972618-c60b0225b8f9",
                categories: &["Nature", "Adventure"],
                description: "Found this hidden gem deep in the forest.",
                featured: true,
            },
            SamplePost {
                title: "Morning Mist",
                image_link: "https://images.unsplash.com/photo-1470071459604-3b5ec3a7fe05",
                categories: &["Nature"],
                description: "Early morning vibes.",
                featured: false,
            },
        ],
    },
    SampleUser {
        username: "david_photo",
        full_name: "David Miller",
        email: "david@example.com",
        posts: &[SamplePost {
            title: "Architectural Wonders",
            image_link: "https://images.unsplash.com/photo-1518791841217-8f162f1e1131",
            categories: &["City", "Landmarks"],
            description: "The geometry of this building is amazing.",
            featured: false,
        }],
    },
    SampleUser {
        username: "jessica_wander",
        full_name: "Jessica Taylor",
        email: "jessica@example.com",
        posts: &[SamplePost {
            title: "Desert Safari",
            image_link: "https://images.unsplash.com/photo-1509316975850-ff9c5deb0cd9",
            categories: &["Adventure", "Nature"],
            description: "Riding camels into the sunset.",
            featured: true,
        }],
    },
];

/// Creates the sample users and their posts.
///
/// Posts are written through the repository: the sample images are CDN
/// links without a file extension, which the public API would reject.
async fn seed(config: &Config) -> Result<()> {
    println!("{}", "🌱 Seeding sample data".bright_blue().bold());
    println!();

    let (storage, users) = user_service(config).await?;
    let mut created_posts = 0;

    for sample in SAMPLE_USERS {
        if storage
            .users
            .find_by_email(sample.email)
            .await
            .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
            .is_some()
        {
            println!(
                "  {} {} already exists, skipping",
                "•".bright_black(),
                sample.username.cyan()
            );
            continue;
        }

        let user = users
            .register(RegisterUser {
                username: sample.username.to_string(),
                full_name: sample.full_name.to_string(),
                email: sample.email.to_string(),
                password: SAMPLE_PASSWORD.to_string(),
                role: Role::User,
            })
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {}", sample.username, e))?;

        for post in sample.posts {
            storage
                .posts
                .create(sample_post(&user, post))
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create '{}': {}", post.title, e))?;
            created_posts += 1;
        }

        println!(
            "  {} {} with {} posts",
            "✓".green(),
            user.username.cyan(),
            sample.posts.len()
        );
    }

    if created_posts > 0 {
        let cache = connect_cache(config).await;
        slots::invalidate_all(cache.as_ref()).await;
    }

    println!();
    println!(
        "{} ({} new posts)",
        "✅ Seeding complete".green().bold(),
        created_posts
    );
    println!("  Sample password: {}", SAMPLE_PASSWORD.bright_yellow());
    println!();

    Ok(())
}

fn sample_post(user: &User, post: &SamplePost) -> NewPost {
    NewPost {
        title: post.title.to_string(),
        author_name: user.username.clone(),
        author_id: user.id,
        image_link: post.image_link.to_string(),
        images: vec![post.image_link.to_string()],
        categories: post.categories.iter().map(|c| c.to_string()).collect(),
        description: post.description.to_string(),
        is_featured: post.featured,
    }
}

/// Dispatches token commands.
async fn handle_token_action(action: TokenAction, config: &Config) -> Result<()> {
    match action {
        TokenAction::Issue { user_id } => {
            let (_, users) = user_service(config).await?;
            let user = users
                .get(user_id)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;
            let token = session_service(config).issue(&user);

            println!("{}", "🔑 Session token".bright_blue().bold());
            println!();
            println!("  User:  {} ({})", user.username.cyan(), user.role);
            println!("  Token: {}", token.bright_yellow().bold());
            println!();
            println!("{}", "Example:".bright_white());
            println!(
                "  curl -X DELETE -H \"Authorization: Bearer {}\" http://localhost:3000/api/posts/1",
                token.bright_yellow()
            );
            println!();
        }
    }

    Ok(())
}

/// Dispatches operator session commands.
async fn handle_session_action(action: SessionAction, config: &Config) -> Result<()> {
    let store = FileSessionStore::from_env()?;
    let path = store.path().display().to_string();
    let mut context = SessionContext::load(store)?;

    match action {
        SessionAction::Login { email } => {
            let email = match email {
                Some(email) => email,
                None => Input::new().with_prompt("Email").interact_text()?,
            };
            let password = Password::new().with_prompt("Password").interact()?;

            let (_, users) = user_service(config).await?;
            let user = users
                .authenticate(&email, &password)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;
            let token = session_service(config).issue(&user);

            context.save(&user, token)?;
            println!(
                "{} {} ({})",
                "✅ Logged in as".green().bold(),
                user.username.cyan(),
                path.bright_black()
            );
        }
        SessionAction::Show => match context.current() {
            Some(session) => {
                println!("{}", "👤 Current session".bright_blue().bold());
                println!();
                println!("  User:  {} (id {})", session.username.cyan(), session.user_id);
                println!("  Email: {}", session.email);
                println!("  Role:  {}", session.role);
                println!(
                    "  Saved: {}",
                    session.saved_at.format("%Y-%m-%d %H:%M").to_string().bright_black()
                );
                println!("  Token: {}", session.token.bright_yellow());
            }
            None => println!("{}", "  Not logged in".yellow()),
        },
        SessionAction::Clear => {
            context.clear()?;
            println!("{}", "✅ Session cleared".green().bold());
        }
    }

    Ok(())
}

/// Dispatches cache commands.
async fn handle_cache_action(action: CacheAction, config: &Config) -> Result<()> {
    if !config.is_cache_enabled() {
        println!("{}", "⚠️  Redis is not configured; nothing is cached".yellow());
        return Ok(());
    }

    let cache: Arc<dyn CacheService> = connect_cache(config).await;

    match action {
        CacheAction::Inspect { slot } => {
            let slot = CacheSlot::from_name(&slot)
                .with_context(|| format!("Unknown slot '{}', use all, featured or latest", slot))?;

            match cache.get(slot.key()).await? {
                Some(body) => {
                    let value: serde_json::Value = serde_json::from_str(&body)?;
                    let count = value.as_array().map_or(0, Vec::len);
                    println!(
                        "{} {} ({} posts)",
                        "📦".bright_blue(),
                        slot.key().bright_white().bold(),
                        count
                    );
                    println!("{}", serde_json::to_string_pretty(&value)?);
                }
                None => println!("  {} is empty", slot.key().cyan()),
            }
        }
        CacheAction::Clear => {
            for slot in CacheSlot::ALL {
                cache.delete(slot.key()).await?;
                println!("  {} {}", "✓".green(), slot.key());
            }
            println!("{}", "✅ Cache cleared".green().bold());
        }
    }

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, config: &Config) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            let storage = connect_storage(config).await?;
            storage
                .posts
                .ping()
                .await
                .map_err(|e| anyhow::anyhow!("Database check failed: {}", e))?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
    }

    Ok(())
}

/// Generates a random password.
///
/// # Format
///
/// - Length: 20 characters
/// - Character set: A-Z, a-z, 0-9
fn generate_password() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const PASSWORD_LEN: usize = 20;

    let mut rng = rand::rng();

    (0..PASSWORD_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
