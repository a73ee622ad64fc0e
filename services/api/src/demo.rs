use crate::infra::{
    load_settings_document, InMemoryProposalStore, InMemorySettingsStore, OutboxDispatcher,
};
use clap::Args;
use reply_triage::error::AppError;
use reply_triage::workflows::triage::{
    evaluate, resolve, ConversationId, IncomingMessage, RuleSettings, TriageService,
    TriageSettings,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const SAMPLE_MESSAGES: [(&str, &str); 6] = [
    (
        "Avery (Talent Partner)",
        "Hello, are you interested in this opportunity?",
    ),
    (
        "Jordan, Staffing Lead",
        "This NYC role has great responsibility but salary is TBD",
    ),
    ("Sam @ Remote-first startup", "Remote position available"),
    ("Riley", "NYC opportunity, let's connect"),
    (
        "Morgan, Agency Recruiter",
        "This remote role has a salary range of 150-180k",
    ),
    ("Unknown sender", ""),
];

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Message body to classify
    #[arg(long)]
    pub(crate) text: String,
    /// JSON settings document layered over the defaults
    #[arg(long)]
    pub(crate) settings: Option<PathBuf>,
    /// Print the proposal as JSON instead of plain text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SettingsArgs {
    /// JSON settings document layered over the defaults
    #[arg(long)]
    pub(crate) settings: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// JSON settings document layered over the defaults
    #[arg(long)]
    pub(crate) settings: Option<PathBuf>,
    /// Force auto-send on so the demo shows queued replies
    #[arg(long)]
    pub(crate) auto_send: bool,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        text,
        settings,
        json,
    } = args;

    let resolved = resolve_settings(settings.as_deref())?;
    let proposal = evaluate(&text, &resolved.rules);

    if json {
        match serde_json::to_string_pretty(&proposal) {
            Ok(rendered) => println!("{rendered}"),
            Err(err) => println!("proposal unavailable: {err}"),
        }
    } else {
        println!("Rule: {}", proposal.rule);
        println!("Reply: {}", proposal.reply);
    }

    Ok(())
}

pub(crate) fn run_settings_show(args: SettingsArgs) -> Result<(), AppError> {
    let resolved = resolve_settings(args.settings.as_deref())?;
    match serde_json::to_string_pretty(&resolved) {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => println!("settings unavailable: {err}"),
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        settings,
        auto_send,
    } = args;

    let mut document = load_settings_document(settings.as_deref())?.unwrap_or_default();
    if auto_send {
        document.auto_send = Some(true);
    }

    let outbox = OutboxDispatcher::default();
    let service = TriageService::new(
        Arc::new(InMemorySettingsStore::default()),
        Arc::new(InMemoryProposalStore::default()),
        Arc::new(outbox.clone()),
    );
    let resolved = service.update_settings(document)?;

    println!("Reply triage demo");
    println!(
        "Keywords: location [{}] | job description [{}] | salary [{}]",
        resolved.rules.location_keywords.phrases().join(", "),
        resolved.rules.job_desc_keywords.phrases().join(", "),
        resolved.rules.salary_keywords.phrases().join(", ")
    );
    println!(
        "Auto-send: {}",
        if resolved.auto_send { "on" } else { "off" }
    );

    for (index, (meta, content)) in SAMPLE_MESSAGES.iter().enumerate() {
        let conversation = ConversationId(format!("demo-{}", index + 1));
        let outcome = service.handle_incoming(&conversation, IncomingMessage::new(meta, content))?;

        let shown = if content.is_empty() { "(empty)" } else { *content };
        println!("\n[{}] {} wrote: {}", conversation, meta, shown);
        println!("  Rule: {}", outcome.proposal.rule);
        println!("  Proposed reply: {}", outcome.proposal.reply);

        for reply in outbox.drain(&conversation) {
            println!("  Queued for sending: {}", reply.text);
        }
    }

    if !resolved.templates.is_empty() {
        println!("\nSaved templates");
        for (index, template) in resolved.templates.iter().enumerate() {
            println!("- {}: {}", template.label(index), template.content);
        }
    }

    Ok(())
}

fn resolve_settings(path: Option<&Path>) -> Result<TriageSettings, AppError> {
    let document = load_settings_document(path)?.unwrap_or_default();
    Ok(resolve(&document, &RuleSettings::defaults())?)
}
