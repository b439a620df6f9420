//! FAQ command handlers.
//!
//! Browsing is open to everyone; add/edit/delete require an admin session.

use super::{open_service, print_json, resolve_session};
use clap::{Args, Subcommand};
use helpdesk_core::{config::AppConfig, AppResult};
use helpdesk_faq::{require_admin, FaqEntry, FaqService, FaqUpdate, NewFaq, KNOWN_CATEGORIES};

/// Browse and curate FAQ entries
#[derive(Args, Debug)]
pub struct FaqCommand {
    #[command(subcommand)]
    pub command: FaqSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum FaqSubcommand {
    /// List FAQ entries
    List(ListArgs),

    /// Show one entry (counts as a view)
    Show(ShowArgs),

    /// Add an entry (admin)
    Add(AddArgs),

    /// Edit an entry (admin)
    Edit(EditArgs),

    /// Delete an entry (admin)
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only entries in this category
    #[arg(long)]
    pub category: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Entry id
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(long)]
    pub question: String,

    #[arg(long)]
    pub answer: String,

    /// Category (defaults to "General Information")
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Entry id
    pub id: String,

    #[arg(long)]
    pub question: Option<String>,

    #[arg(long)]
    pub answer: Option<String>,

    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Entry id
    pub id: String,
}

impl FaqCommand {
    pub fn name(&self) -> &'static str {
        match self.command {
            FaqSubcommand::List(_) => "faq.list",
            FaqSubcommand::Show(_) => "faq.show",
            FaqSubcommand::Add(_) => "faq.add",
            FaqSubcommand::Edit(_) => "faq.edit",
            FaqSubcommand::Delete(_) => "faq.delete",
        }
    }

    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing {} command", self.name());

        let service = open_service(config)?;

        match &self.command {
            FaqSubcommand::List(args) => list(&service, args).await,
            FaqSubcommand::Show(args) => show(&service, args).await,
            FaqSubcommand::Add(args) => {
                ensure_admin(config, &service).await?;
                add(&service, args).await
            }
            FaqSubcommand::Edit(args) => {
                ensure_admin(config, &service).await?;
                edit(&service, args).await
            }
            FaqSubcommand::Delete(args) => {
                ensure_admin(config, &service).await?;
                service.delete_faq(&args.id).await?;
                println!("Deleted FAQ {}", args.id);
                Ok(())
            }
        }
    }
}

async fn ensure_admin(config: &AppConfig, service: &FaqService) -> AppResult<()> {
    let session = resolve_session(config, service).await;
    let admin = require_admin(&session)?;
    tracing::debug!("Admin session for {}", admin.id);
    Ok(())
}

async fn list(service: &FaqService, args: &ListArgs) -> AppResult<()> {
    let faqs = match args.category {
        Some(ref category) => service.faqs_by_category(category).await?,
        None => service.list_faqs().await?,
    };

    if args.json {
        return print_json(&faqs);
    }

    if faqs.is_empty() {
        println!("No FAQs found.");
        return Ok(());
    }

    for faq in &faqs {
        println!(
            "{}  [{}]  {} ({} views)",
            faq.id, faq.category, faq.question, faq.view_count
        );
    }
    Ok(())
}

async fn show(service: &FaqService, args: &ShowArgs) -> AppResult<()> {
    let mut faq = service.get_faq(&args.id).await?;

    if let Some(count) = service.increment_view_count(&args.id).await {
        faq.view_count = count;
    }

    if args.json {
        return print_json(&faq);
    }

    print_entry(&faq);
    Ok(())
}

fn print_entry(faq: &FaqEntry) {
    println!("Q: {}", faq.question);
    println!("A: {}", faq.answer);
    println!();
    println!("Category: {}", faq.category);
    println!("Keywords: {}", faq.keywords.join(", "));
    println!("Views:    {}", faq.view_count);
}

fn warn_unknown_category(category: Option<&str>) {
    if let Some(category) = category {
        if !KNOWN_CATEGORIES.contains(&category.trim()) {
            tracing::warn!(
                "Category '{}' is not one of: {}",
                category,
                KNOWN_CATEGORIES.join(", ")
            );
        }
    }
}

async fn add(service: &FaqService, args: &AddArgs) -> AppResult<()> {
    warn_unknown_category(args.category.as_deref());

    let mut faq = NewFaq::new(args.question.clone(), args.answer.clone());
    if let Some(ref category) = args.category {
        faq = faq.with_category(category.clone());
    }

    let id = service.create_faq(faq).await?;
    println!("Created FAQ {}", id);
    Ok(())
}

async fn edit(service: &FaqService, args: &EditArgs) -> AppResult<()> {
    warn_unknown_category(args.category.as_deref());

    let update = FaqUpdate {
        question: args.question.clone(),
        answer: args.answer.clone(),
        category: args.category.clone(),
    };

    service.update_faq(&args.id, update).await?;
    println!("Updated FAQ {}", args.id);
    Ok(())
}
