//! Helpdesk CLI - Customer service agent from the terminal
//!
//! Thin client over the Helpdesk HTTP API.

mod api;
mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{Input, Password};
use serde_json::{Map, Value};
use std::fs;

use api::{CrmEntryRequest, EmailRequest, HelpdeskClient, TicketRequest};
use config::Config;

#[derive(Parser)]
#[command(name = "helpdesk")]
#[command(about = "Helpdesk CLI - LLM customer service agent", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Login and store API key
    Login {
        /// API key (will prompt if not provided)
        #[arg(short, long)]
        key: Option<String>,
        /// Server URL (e.g., http://localhost:8000)
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Show current configuration
    Config,

    /// Check configuration, connectivity and authentication
    Doctor,

    /// Email operations
    Email {
        #[command(subcommand)]
        action: EmailAction,
    },

    /// Support ticket operations
    Ticket {
        #[command(subcommand)]
        action: TicketAction,
    },

    /// CRM operations
    Crm {
        #[command(subcommand)]
        action: CrmAction,
    },

    /// Route a customer query to a department
    Route {
        /// The customer query
        query: String,
        /// Customer ID
        #[arg(short, long)]
        customer: Option<String>,
    },

    /// Chat with the agent
    Chat {
        /// Message to send
        message: String,
        /// Customer ID
        #[arg(short, long)]
        customer: Option<String>,
    },

    /// Email batch processing
    Batch {
        #[command(subcommand)]
        action: BatchAction,
    },

    /// Knowledge base operations
    Kb {
        #[command(subcommand)]
        action: KbAction,
    },

    /// Customer context stored by the agent
    Context {
        #[command(subcommand)]
        action: ContextAction,
    },

    /// Conversation history
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
        /// Only this customer's messages
        #[arg(short, long)]
        customer: Option<String>,
        /// Maximum number of messages
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

#[derive(Subcommand)]
enum EmailAction {
    /// Summarize an email
    Summarize {
        /// Email body (or use -f for file)
        body: Option<String>,
        /// Read body from file
        #[arg(short, long)]
        file: Option<String>,
        /// Subject line
        #[arg(long)]
        subject: String,
        /// Sender name or address
        #[arg(long)]
        sender: String,
        /// Send date (defaults to now)
        #[arg(long)]
        date: Option<String>,
        /// Attachment file name (repeatable)
        #[arg(long = "attachment")]
        attachments: Vec<String>,
    },
}

#[derive(Subcommand)]
enum TicketAction {
    /// Categorize and prioritize a ticket
    Categorize {
        /// Ticket description (or use -f for file)
        description: Option<String>,
        /// Read description from file
        #[arg(short, long)]
        file: Option<String>,
        /// Ticket title
        #[arg(long)]
        title: String,
        /// Customer ID
        #[arg(long)]
        customer: Option<String>,
        /// Suggested priority
        #[arg(long)]
        priority: Option<String>,
        /// Suggested category
        #[arg(long)]
        category: Option<String>,
    },
}

#[derive(Subcommand)]
enum CrmAction {
    /// Generate a CRM entry from an interaction
    Create {
        /// Interaction details (or use -f for file)
        details: Option<String>,
        /// Read details from file
        #[arg(short, long)]
        file: Option<String>,
        /// Customer name
        #[arg(long)]
        customer: String,
        /// Additional information as key=value (repeatable)
        #[arg(long = "info")]
        info: Vec<String>,
    },
}

#[derive(Subcommand)]
enum BatchAction {
    /// Start processing unprocessed emails
    Start,
    /// Show batch status and the last report
    Status,
}

#[derive(Subcommand)]
enum KbAction {
    /// Ask the knowledge base
    Query {
        query: String,
        /// Number of chunks to retrieve
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Ingest a file or directory on the server
    Ingest {
        /// Server-side path
        path: String,
    },
    /// Upload a local file as a document
    Add {
        /// Source name stored with the chunks
        #[arg(short, long)]
        source: Option<String>,
        /// Local file to read
        #[arg(short, long)]
        file: String,
    },
}

#[derive(Subcommand)]
enum ContextAction {
    /// Show a customer's context
    Get { customer: String },
    /// Merge key=value pairs into a customer's context
    Set {
        customer: String,
        /// key=value pairs (values are parsed as JSON when possible)
        #[arg(required = true)]
        pairs: Vec<String>,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// Forget the conversation history
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Login { key, url } => cmd_login(key, url).await,
        Commands::Config => cmd_config(),
        Commands::Doctor => cmd_doctor().await,
        Commands::Email { action } => cmd_email(action).await,
        Commands::Ticket { action } => cmd_ticket(action).await,
        Commands::Crm { action } => cmd_crm(action).await,
        Commands::Route { query, customer } => cmd_route(query, customer).await,
        Commands::Chat { message, customer } => cmd_chat(message, customer).await,
        Commands::Batch { action } => cmd_batch(action).await,
        Commands::Kb { action } => cmd_kb(action).await,
        Commands::Context { action } => cmd_context(action).await,
        Commands::History {
            action,
            customer,
            limit,
        } => cmd_history(action, customer, limit).await,
    }
}

// ============================================
// Command Implementations
// ============================================

fn client() -> Result<HelpdeskClient> {
    let config = Config::load()?;
    Ok(HelpdeskClient::new(
        &config.base_url,
        config.api_key.as_deref(),
    ))
}

async fn cmd_login(key: Option<String>, url: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    if let Some(url) = url {
        config.set_base_url(&url);
    }

    let api_key = match key {
        Some(k) => k,
        None => Password::new()
            .with_prompt("API Key")
            .interact()
            .context("Failed to read API key")?,
    };

    // Test connection
    let client = HelpdeskClient::new(&config.base_url, Some(&api_key));
    print!("Testing connection... ");

    match client.health().await {
        Ok(_) => {
            println!("{}", "OK".green());
        }
        Err(e) => {
            println!("{}", "Failed".red());
            bail!("Could not connect to Helpdesk API at {}: {}", config.base_url, e);
        }
    }

    config.set_api_key(api_key);
    config.save()?;

    println!("{} API key saved to {:?}", "✓".green(), Config::config_path()?);
    println!("\n{}", "Tip: verify authentication with:".yellow());
    println!("  helpdesk doctor");

    Ok(())
}

fn cmd_config() -> Result<()> {
    let config = Config::load()?;

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", Config::config_path()?);
    println!("  Base URL: {}", config.base_url);
    println!(
        "  API Key: {}",
        match config.masked_api_key() {
            Some(masked) => masked.green(),
            None => "Not set".red(),
        }
    );

    Ok(())
}

async fn cmd_doctor() -> Result<()> {
    println!("{}", "Helpdesk doctor".bold());
    let mut failures = 0;

    let config = match Config::load() {
        Ok(config) => {
            report_check(true, &format!("Config readable ({:?})", Config::config_path()?));
            config
        }
        Err(e) => {
            report_check(false, &format!("Config readable: {}", e));
            failures += 1;
            Config::default()
        }
    };

    let client = HelpdeskClient::new(&config.base_url, config.api_key.as_deref());
    failures += server_checks(&client, &config).await;

    doctor_verdict(failures)
}

/// Reachability, version and authentication checks; returns the failure count
async fn server_checks(client: &HelpdeskClient, config: &Config) -> usize {
    let mut failures = 0;

    match client.health().await {
        Ok(health) => {
            report_check(
                health.status == "ok",
                &format!("API reachable at {} (status: {})", config.base_url, health.status),
            );
            if health.status != "ok" {
                failures += 1;
            }

            let reported = !health.version.is_empty() && !health.llm_model.is_empty();
            report_check(
                reported,
                &format!(
                    "Server version {} with model {} (RAG {})",
                    or_unknown(&health.version),
                    or_unknown(&health.llm_model),
                    if health.rag_enabled { "enabled" } else { "disabled" }
                ),
            );
            if !reported {
                failures += 1;
            }

            match client.history(None, Some(1)).await {
                Ok(_) => report_check(true, "Authenticated endpoint accepted the API key"),
                Err(e) => {
                    report_check(false, &format!("Authenticated endpoint: {}", e));
                    if config.api_key.is_none() {
                        println!("    {}", "Run 'helpdesk login' to store an API key".dimmed());
                    }
                    failures += 1;
                }
            }
        }
        Err(e) => {
            report_check(false, &format!("API reachable at {}: {}", config.base_url, e));
            failures += 1;
        }
    }

    failures
}

fn doctor_verdict(failures: usize) -> Result<()> {
    if failures > 0 {
        bail!("{} check(s) failed", failures);
    }

    println!("\n{}", "All checks passed".green());
    Ok(())
}

fn report_check(ok: bool, label: &str) {
    if ok {
        println!("  {} {}", "✓".green(), label);
    } else {
        println!("  {} {}", "✗".red(), label);
    }
}

fn or_unknown(value: &str) -> &str {
    if value.is_empty() {
        "unknown"
    } else {
        value
    }
}

async fn cmd_email(action: EmailAction) -> Result<()> {
    let client = client()?;

    match action {
        EmailAction::Summarize {
            body,
            file,
            subject,
            sender,
            date,
            attachments,
        } => {
            let body = read_content(body, file, "Email body")?;
            let request = EmailRequest {
                subject,
                body,
                sender,
                date: date.unwrap_or_else(|| chrono::Local::now().to_rfc3339()),
                attachments,
            };

            let summary = client.summarize_email(&request).await?;
            println!("{}", summary);
        }
    }

    Ok(())
}

async fn cmd_ticket(action: TicketAction) -> Result<()> {
    let client = client()?;

    match action {
        TicketAction::Categorize {
            description,
            file,
            title,
            customer,
            priority,
            category,
        } => {
            let description = read_content(description, file, "Ticket description")?;
            let request = TicketRequest {
                title,
                description,
                customer_id: customer,
                priority,
                category,
            };

            let result = client.categorize_ticket(&request).await?;
            print_fields(&result);
        }
    }

    Ok(())
}

async fn cmd_crm(action: CrmAction) -> Result<()> {
    let client = client()?;

    match action {
        CrmAction::Create {
            details,
            file,
            customer,
            info,
        } => {
            let details = read_content(details, file, "Interaction details")?;
            let additional_info = parse_pairs(&info)?;
            let request = CrmEntryRequest {
                customer_name: customer,
                interaction_details: details,
                additional_info,
            };

            let entry = client.create_crm_entry(&request).await?;
            print_fields(&entry);
        }
    }

    Ok(())
}

async fn cmd_route(query: String, customer: Option<String>) -> Result<()> {
    let client = client()?;
    let routing = client.route_query(&query, customer.as_deref()).await?;
    print_fields(&routing);
    Ok(())
}

async fn cmd_chat(message: String, customer: Option<String>) -> Result<()> {
    let client = client()?;
    let reply = client.chat(&message, customer.as_deref()).await?;

    println!("{}", reply.output);
    if !reply.tools_used.is_empty() {
        println!(
            "\n{} {}",
            "Tools used:".dimmed(),
            reply.tools_used.join(", ").dimmed()
        );
    }
    Ok(())
}

async fn cmd_batch(action: BatchAction) -> Result<()> {
    let client = client()?;

    match action {
        BatchAction::Start => {
            let message = client.start_batch().await?;
            println!("{} {}", "✓".green(), message);
            println!("  Check progress with: helpdesk batch status");
        }
        BatchAction::Status => {
            let status = client.batch_status().await?;
            println!(
                "Batch: {}",
                if status.running {
                    "running".yellow()
                } else {
                    "idle".green()
                }
            );

            match status.last_report {
                Some(report) => {
                    println!("{}", "Last report:".bold());
                    println!("  Started:  {}", report.started_at);
                    println!("  Finished: {}", report.finished_at);
                    println!(
                        "  Processed {}/{} emails, {} tickets, {} CRM entries",
                        report.processed.to_string().green(),
                        report.fetched,
                        report.tickets_created,
                        report.crm_entries_created
                    );
                    for failure in report.failures {
                        println!("  {} {}: {}", "✗".red(), failure.email_id, failure.error);
                    }
                }
                None => println!("No batch has run yet."),
            }
        }
    }

    Ok(())
}

async fn cmd_kb(action: KbAction) -> Result<()> {
    let client = client()?;

    match action {
        KbAction::Query { query, limit } => {
            let answer = client.query_knowledge(&query, limit).await?;
            println!("{}", answer);
        }
        KbAction::Ingest { path } => {
            let chunks = client.ingest_path(&path).await?;
            println!("{} Added {} chunks from {}", "✓".green(), chunks, path.cyan());
        }
        KbAction::Add { source, file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read file: {}", file))?;
            let source = source.unwrap_or_else(|| file.clone());
            let chunks = client.add_text(&source, &text).await?;
            println!("{} Added {} chunks as {}", "✓".green(), chunks, source.cyan());
        }
    }

    Ok(())
}

async fn cmd_context(action: ContextAction) -> Result<()> {
    let client = client()?;

    match action {
        ContextAction::Get { customer } => {
            let context = client.customer_context(&customer).await?;
            if context.is_empty() {
                println!("No context stored for {}", customer.cyan());
                return Ok(());
            }
            println!("{}", format!("Context for {}:", customer).bold());
            print_fields(&Value::Object(context));
        }
        ContextAction::Set { customer, pairs } => {
            let data = parse_pairs(&pairs)?;
            let merged = client.update_customer_context(&customer, &data).await?;
            println!(
                "{} Context updated for {} ({} keys)",
                "✓".green(),
                customer.cyan(),
                merged.len()
            );
        }
    }

    Ok(())
}

async fn cmd_history(
    action: Option<HistoryAction>,
    customer: Option<String>,
    limit: Option<usize>,
) -> Result<()> {
    let client = client()?;

    if let Some(HistoryAction::Clear) = action {
        client.clear_history().await?;
        println!("{} Conversation history cleared", "✓".green());
        return Ok(());
    }

    let messages = client.history(customer.as_deref(), limit).await?;
    if messages.is_empty() {
        println!("No messages remembered.");
        return Ok(());
    }

    for message in messages {
        let speaker = match message.kind.as_str() {
            "human" => "customer".cyan(),
            "ai" => "agent".green(),
            other => other.dimmed(),
        };
        let customer = message
            .customer_id
            .map(|id| format!(" [{}]", id))
            .unwrap_or_default();
        println!(
            "{}{}: {}",
            speaker,
            customer.dimmed(),
            truncate_string(&message.content, 120)
        );
    }

    Ok(())
}

// ============================================
// Helpers
// ============================================

/// Content from an argument, a file, or an interactive prompt
fn read_content(content: Option<String>, file: Option<String>, prompt: &str) -> Result<String> {
    match (content, file) {
        (Some(c), None) => Ok(c),
        (None, Some(f)) => {
            fs::read_to_string(&f).with_context(|| format!("Failed to read file: {}", f))
        }
        (Some(_), Some(_)) => {
            bail!("Cannot specify both content and --file");
        }
        (None, None) => Input::new()
            .with_prompt(prompt)
            .interact_text()
            .context("Failed to read input"),
    }
}

/// Parse `key=value` pairs; values are JSON when they parse, strings otherwise
fn parse_pairs(pairs: &[String]) -> Result<Map<String, Value>> {
    let mut map = Map::new();
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("Expected key=value, got '{}'", pair);
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("Empty key in '{}'", pair);
        }
        let value = serde_json::from_str(value.trim())
            .unwrap_or_else(|_| Value::String(value.to_string()));
        map.insert(key.to_string(), value);
    }
    Ok(map)
}

/// Print an object as aligned `key: value` lines
fn print_fields(value: &Value) {
    let Some(object) = value.as_object() else {
        println!("{}", value);
        return;
    };

    for (key, field) in object {
        let rendered = match field {
            Value::String(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        };
        let label = if key == "error" {
            key.red().bold()
        } else {
            key.cyan()
        };
        println!("  {}: {}", label, rendered);
    }
}

/// Truncate string safely for UTF-8 (by char count, not bytes)
fn truncate_string(s: &str, max_chars: usize) -> String {
    let chars: Vec<char> = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        format!("{}...", chars.into_iter().collect::<String>())
    } else {
        s.to_string()
    }
}
