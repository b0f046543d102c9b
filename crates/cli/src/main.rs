//! Terminal front end for the shared-expense backend.
//!
//! Commands map onto the per-view snapshot state in [`views`]: run the
//! operation, then print the refreshed snapshot, or the view's one-line
//! error with a non-zero exit.

use api_types::{Amount, balance::Balance, group::Group, instance::Instance, item::Item};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use client::{ApiClient, FixedTokens, TokenProvider};

use crate::error::Result;

mod config;
mod error;
mod views;

#[derive(Debug, Parser)]
#[command(name = "divvy")]
#[command(about = "Terminal client for the shared-expense backend")]
struct Cli {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:8000).
    #[arg(long)]
    base_url: Option<String>,
    /// Override the signed-in account email.
    #[arg(long)]
    email: Option<String>,
    /// Override the session bearer token.
    #[arg(long)]
    token: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Group membership and lifecycle.
    Groups(Groups),
    /// Recorded shared-expense events ("shopping trips").
    Instances(Instances),
    /// Purchased lines within a trip.
    Items(Items),
    /// Who owes whom, from the signed-in account's point of view.
    Balances,
}

#[derive(Args, Debug)]
struct Groups {
    #[command(subcommand)]
    command: GroupsCommand,
}

#[derive(Debug, Subcommand)]
enum GroupsCommand {
    List,
    Create(GroupWriteArgs),
    Update(GroupUpdateArgs),
    Delete(IdArg),
    /// Remove the signed-in account from a group.
    Leave(IdArg),
    /// Invite a user into a group by email.
    AddMember(AddMemberArgs),
}

#[derive(Args, Debug)]
struct GroupWriteArgs {
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    description: String,
}

#[derive(Args, Debug)]
struct GroupUpdateArgs {
    #[arg(long)]
    id: i64,
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    description: String,
}

#[derive(Args, Debug)]
struct IdArg {
    #[arg(long)]
    id: i64,
}

#[derive(Args, Debug)]
struct AddMemberArgs {
    #[arg(long)]
    id: i64,
    #[arg(long)]
    email: String,
}

#[derive(Args, Debug)]
struct Instances {
    #[command(subcommand)]
    command: InstancesCommand,
}

#[derive(Debug, Subcommand)]
enum InstancesCommand {
    List,
    Show(IdArg),
    Create(InstanceWriteArgs),
    Update(InstanceUpdateArgs),
    Delete(IdArg),
}

#[derive(Args, Debug)]
struct InstanceWriteArgs {
    #[arg(long)]
    name: String,
    /// Trip date (YYYY-MM-DD).
    #[arg(long)]
    date: NaiveDate,
    #[arg(long, default_value = "")]
    description: String,
    /// Owning group id.
    #[arg(long)]
    group: i64,
}

#[derive(Args, Debug)]
struct InstanceUpdateArgs {
    #[arg(long)]
    id: i64,
    #[arg(long)]
    name: String,
    #[arg(long)]
    date: NaiveDate,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long)]
    group: i64,
}

#[derive(Args, Debug)]
struct Items {
    #[command(subcommand)]
    command: ItemsCommand,
}

#[derive(Debug, Subcommand)]
enum ItemsCommand {
    List,
    Create(ItemWriteArgs),
    Update(ItemUpdateArgs),
    Delete(IdArg),
}

#[derive(Args, Debug)]
struct ItemWriteArgs {
    #[arg(long)]
    name: String,
    /// Decimal price, e.g. 12.50.
    #[arg(long)]
    price: Amount,
    /// Owning instance id.
    #[arg(long)]
    instance: i64,
    /// Comma-separated user ids the item is shared with.
    #[arg(long, value_delimiter = ',')]
    shared_with: Vec<i64>,
}

#[derive(Args, Debug)]
struct ItemUpdateArgs {
    #[arg(long)]
    id: i64,
    #[arg(long)]
    name: String,
    #[arg(long)]
    price: Amount,
    #[arg(long)]
    instance: i64,
    #[arg(long, value_delimiter = ',')]
    shared_with: Vec<i64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = config::load(config::Overrides {
        config: cli.config,
        base_url: cli.base_url,
        email: cli.email,
        token: cli.token,
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "divvy={level},client={level}",
            level = settings.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let tokens = if settings.token.is_empty() {
        FixedTokens::anonymous()
    } else {
        FixedTokens::bearer(settings.token.clone())
    };
    let api = ApiClient::new(settings.base_url.clone(), tokens);

    match cli.command {
        Command::Groups(Groups { command }) => run_groups(&api, command).await,
        Command::Instances(Instances { command }) => run_instances(&api, command).await,
        Command::Items(Items { command }) => run_items(&api, command).await,
        Command::Balances => run_balances(&api, &settings.email).await,
    }

    Ok(())
}

async fn run_groups<P: TokenProvider>(api: &ApiClient<P>, command: GroupsCommand) {
    let mut view = views::GroupsView::default();
    match command {
        GroupsCommand::List => view.refresh(api).await,
        GroupsCommand::Create(args) => view.create(api, &args.name, &args.description).await,
        GroupsCommand::Update(args) => {
            view.update(api, args.id, &args.name, &args.description)
                .await;
        }
        GroupsCommand::Delete(args) => view.remove(api, args.id).await,
        GroupsCommand::Leave(args) => view.leave(api, args.id).await,
        GroupsCommand::AddMember(args) => view.invite(api, args.id, &args.email).await,
    }
    report(view.error.as_deref());
    print_groups(&view.groups);
}

async fn run_instances<P: TokenProvider>(api: &ApiClient<P>, command: InstancesCommand) {
    let mut view = views::InstancesView::default();
    match command {
        InstancesCommand::List => view.refresh(api).await,
        InstancesCommand::Show(args) => {
            match api.instance(args.id).await {
                Ok(instance) => print_instance_detail(&instance),
                Err(err) => {
                    tracing::error!("instance fetch failed: {err}");
                    eprintln!("Failed to fetch instance");
                    std::process::exit(1);
                }
            }
            return;
        }
        InstancesCommand::Create(args) => {
            view.create(api, &args.name, args.date, &args.description, args.group)
                .await;
        }
        InstancesCommand::Update(args) => {
            view.update(
                api,
                args.id,
                &args.name,
                args.date,
                &args.description,
                args.group,
            )
            .await;
        }
        InstancesCommand::Delete(args) => view.remove(api, args.id).await,
    }
    report(view.error.as_deref());
    print_instances(&view.instances);
}

async fn run_items<P: TokenProvider>(api: &ApiClient<P>, command: ItemsCommand) {
    let mut view = views::ItemsView::default();
    match command {
        ItemsCommand::List => view.refresh(api).await,
        ItemsCommand::Create(args) => {
            view.create(api, &args.name, args.price, args.instance, args.shared_with)
                .await;
        }
        ItemsCommand::Update(args) => {
            view.update(
                api,
                args.id,
                &args.name,
                args.price,
                args.instance,
                args.shared_with,
            )
            .await;
        }
        ItemsCommand::Delete(args) => view.remove(api, args.id).await,
    }
    report(view.error.as_deref());
    print_items(&view.items);
}

async fn run_balances<P: TokenProvider>(api: &ApiClient<P>, email: &str) {
    if email.trim().is_empty() {
        eprintln!("No account email configured; set `email` in the config or pass --email");
        std::process::exit(1);
    }

    let mut view = views::BalancesView::default();
    view.refresh(api, email).await;
    report(view.error.as_deref());
    print_balances(&view);
}

fn report(error: Option<&str>) {
    if let Some(message) = error {
        eprintln!("{message}");
        std::process::exit(1);
    }
}

fn print_groups(groups: &[Group]) {
    if groups.is_empty() {
        println!("No groups yet.");
        return;
    }
    for group in groups {
        println!(
            "#{} {} ({} members, created {})",
            group.id,
            group.name,
            group.members.len(),
            group.created_at.format("%Y-%m-%d")
        );
        if !group.description.is_empty() {
            println!("    {}", group.description);
        }
    }
}

fn print_instances(instances: &[Instance]) {
    if instances.is_empty() {
        println!("No shopping trips recorded yet.");
        return;
    }
    for instance in instances {
        println!(
            "#{} {} on {} ({} items, group #{})",
            instance.id,
            instance.name,
            instance.date,
            instance.items.len(),
            instance.group
        );
        if !instance.description.is_empty() {
            println!("    {}", instance.description);
        }
    }
}

fn print_instance_detail(instance: &Instance) {
    println!("#{} {} on {}", instance.id, instance.name, instance.date);
    if !instance.description.is_empty() {
        println!("{}", instance.description);
    }
    for item in &instance.items {
        println!(
            "    {} {} (shared by {})",
            item.name,
            item.price,
            item.shared_with.len()
        );
    }
}

fn print_items(items: &[Item]) {
    if items.is_empty() {
        println!("No items yet.");
        return;
    }
    for item in items {
        println!(
            "#{} {} {} (instance #{}, shared by {})",
            item.id,
            item.name,
            item.price,
            item.instance,
            item.shared_with.len()
        );
    }
}

fn print_balances(view: &views::BalancesView) {
    println!("I owe:");
    if view.i_owe.is_empty() {
        println!("    nothing, all settled");
    }
    for balance in &view.i_owe {
        print_balance_line(balance.to_user.display_name(), balance);
    }

    println!("Owed to me:");
    if view.owed_to_me.is_empty() {
        println!("    nothing");
    }
    for balance in &view.owed_to_me {
        print_balance_line(balance.from_user.display_name(), balance);
    }
}

fn print_balance_line(name: String, balance: &Balance) {
    println!("    {}: {}", name, balance.amount);
}
