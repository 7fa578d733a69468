use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result, miette};
use payment_console::application::browser::{LoadOutcome, TransactionBrowser};
use payment_console::application::dashboard::load_dashboard;
use payment_console::application::gateway::ApiGateway;
use payment_console::application::wizard::{
    FieldUpdate, PaymentOutcome, PaymentWizard, Transition, WizardState, WizardStep,
};
use payment_console::config::{
    ConsoleConfig, DEFAULT_APPROVAL_RATE, DEFAULT_BASE_URL, DEFAULT_CURRENCY, GatewayConfig,
    MockConfig, MockLatency,
};
use payment_console::domain::payment::RefundRequest;
use payment_console::domain::query::{PageRequest, TransactionFilter};
use payment_console::domain::transaction::{Amount, TransactionStatus, TransactionType};
use payment_console::infrastructure::http::HttpBackend;
use payment_console::infrastructure::in_memory::MockBackend;
use payment_console::interfaces::csv::transaction_reader::TransactionReader;
use payment_console::interfaces::csv::transaction_writer::TransactionWriter;
use payment_console::interfaces::report;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Operator console for the payment processing backend", long_about = None)]
struct Cli {
    /// Base URL of the payment executor service
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = 10)]
    timeout_secs: u64,

    /// Use the in-memory mock backend instead of the HTTP service
    #[arg(long, global = true)]
    mock: bool,

    /// Simulated latency for every mock operation, in milliseconds
    #[arg(long, global = true)]
    mock_latency_ms: Option<u64>,

    /// Probability that a mock payment is approved
    #[arg(long, global = true, default_value_t = DEFAULT_APPROVAL_RATE)]
    approval_rate: f64,

    /// Fixed seed for the mock's payment outcomes
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// CSV file with the mock's initial transactions
    #[arg(long, global = true)]
    seed_file: Option<PathBuf>,

    /// Currency preselected in the payment wizard
    #[arg(long, global = true, default_value = DEFAULT_CURRENCY)]
    default_currency: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit a payment through the payment wizard
    Pay(PayArgs),
    /// List transactions matching a filter
    Transactions(ListArgs),
    /// Show one transaction
    Show { id: String },
    /// Refund a transaction
    Refund(RefundArgs),
    /// List refunds
    Refunds {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = PageRequest::DEFAULT_PAGE_SIZE)]
        page_size: u32,
    },
    /// Show aggregate statistics and the most recent transactions
    Dashboard,
    /// Check the backend's health endpoint
    Health,
}

#[derive(Args)]
struct PayArgs {
    #[arg(long)]
    amount: String,
    #[arg(long)]
    currency: Option<String>,
    #[arg(long)]
    buyer_document: String,
    #[arg(long)]
    buyer_name: String,
    /// Masked card number shown to operators
    #[arg(long)]
    card: String,
    /// Opaque card token issued by the tokenization service
    #[arg(long)]
    card_token: String,
    #[arg(long)]
    seller_document: String,
    #[arg(long)]
    seller_name: String,
}

#[derive(Args)]
struct ListArgs {
    #[arg(long)]
    status: Option<TransactionStatus>,
    #[arg(long = "type")]
    kind: Option<TransactionType>,
    /// First creation date to include (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last creation date to include (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,
    #[arg(long)]
    min_amount: Option<Amount>,
    #[arg(long)]
    max_amount: Option<Amount>,
    #[arg(long)]
    currency: Option<String>,
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long, default_value_t = PageRequest::DEFAULT_PAGE_SIZE)]
    page_size: u32,
    /// Write the page as CSV instead of a table
    #[arg(long)]
    csv: bool,
}

#[derive(Args)]
struct RefundArgs {
    #[arg(long)]
    transaction_id: String,
    #[arg(long)]
    amount: Amount,
    #[arg(long)]
    currency: Option<String>,
    #[arg(long)]
    reason: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("payment_console=info")),
        )
        .with_writer(io::stderr)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let console = ConsoleConfig {
        default_currency: cli.default_currency.clone(),
    };
    let gateway = build_gateway(&cli)?;

    match cli.command {
        Command::Pay(args) => pay(&gateway, &console, args).await,
        Command::Transactions(args) => list(&gateway, args).await,
        Command::Show { id } => {
            let tx = gateway.get_transaction(&id).await.into_diagnostic()?;
            print!("{}", report::transaction_details(&tx));
            Ok(())
        }
        Command::Refund(args) => {
            let request = RefundRequest {
                transaction_id: args.transaction_id,
                amount: args.amount,
                currency: args.currency.unwrap_or(console.default_currency),
                reason: args.reason,
            };
            let result = gateway.create_refund(request).await.into_diagnostic()?;
            print!("{}", report::payment_result(&result));
            Ok(())
        }
        Command::Refunds { page, page_size } => {
            let refunds = gateway
                .get_refunds(PageRequest::new(page, page_size))
                .await
                .into_diagnostic()?;
            print!("{}", report::transaction_page(&refunds));
            Ok(())
        }
        Command::Dashboard => {
            let view = load_dashboard(&gateway).await.into_diagnostic()?;
            print!("{}", report::dashboard(&view));
            Ok(())
        }
        Command::Health => {
            let health = gateway.health_check().await.into_diagnostic()?;
            println!("{}", health.status);
            Ok(())
        }
    }
}

/// Chooses the backend once and wraps it in the gateway every command shares.
fn build_gateway(cli: &Cli) -> Result<ApiGateway> {
    if !cli.mock {
        let config = GatewayConfig::new(cli.base_url.clone(), Duration::from_secs(cli.timeout_secs))
            .into_diagnostic()?;
        info!("Using payment service at {}", config.base_url);
        let backend = HttpBackend::new(config).into_diagnostic()?;
        return Ok(ApiGateway::from_backend(backend));
    }

    let mut config = MockConfig::default()
        .with_approval_rate(cli.approval_rate)
        .into_diagnostic()?;
    if let Some(ms) = cli.mock_latency_ms {
        config.latency = MockLatency::uniform(Duration::from_millis(ms));
    }
    config.seed = cli.seed;

    let backend = match &cli.seed_file {
        Some(path) => {
            let file = File::open(path).into_diagnostic()?;
            let mut transactions = Vec::new();
            for tx_result in TransactionReader::new(file).transactions() {
                match tx_result {
                    Ok(tx) => transactions.push(tx),
                    Err(e) => warn!("Skipping seed row: {}", e),
                }
            }
            info!("Loaded {} mock transactions from {}", transactions.len(), path.display());
            MockBackend::with_transactions(config, transactions)
        }
        None => MockBackend::new(config),
    };
    info!("Using in-memory mock backend");
    Ok(ApiGateway::from_backend(backend))
}

async fn pay(gateway: &ApiGateway, console: &ConsoleConfig, args: PayArgs) -> Result<()> {
    let wizard = PaymentWizard::new(gateway.clone(), console.default_currency.clone());

    let mut amount_step = vec![FieldUpdate::Amount(args.amount)];
    if let Some(currency) = args.currency {
        amount_step.push(FieldUpdate::Currency(currency));
    }
    let steps = [
        (WizardStep::Amount, amount_step),
        (
            WizardStep::Buyer,
            vec![
                FieldUpdate::BuyerDocument(args.buyer_document),
                FieldUpdate::BuyerName(args.buyer_name),
            ],
        ),
        (
            WizardStep::CardAndSeller,
            vec![
                FieldUpdate::CardDisplay(args.card),
                FieldUpdate::CardToken(args.card_token),
                FieldUpdate::SellerDocument(args.seller_document),
                FieldUpdate::SellerName(args.seller_name),
            ],
        ),
    ];

    for (step, updates) in steps {
        for update in updates {
            if let Transition::Rejected(reason) = wizard.update(update).await {
                return Err(miette!("{} cannot be edited ({:?})", step.label(), reason));
            }
        }
        let transition = match step {
            WizardStep::CardAndSeller => wizard.submit().await,
            _ => wizard.advance().await,
        };
        if let Transition::Rejected(reason) = transition {
            return Err(miette!("{} is incomplete or invalid ({:?})", step.label(), reason));
        }
    }

    match wizard.state().await {
        WizardState::Result(outcome) => {
            print!("{}", report::payment_outcome(&outcome));
            match outcome {
                PaymentOutcome::Completed(_) => Ok(()),
                PaymentOutcome::Failed(e) => Err::<(), _>(e).into_diagnostic(),
            }
        }
        other => Err(miette!("Payment wizard ended in unexpected state {:?}", other)),
    }
}

async fn list(gateway: &ApiGateway, args: ListArgs) -> Result<()> {
    let browser = TransactionBrowser::new(gateway.clone(), args.page_size);
    browser
        .set_filter(TransactionFilter {
            status: args.status,
            r#type: args.kind,
            date_from: args.from,
            date_to: args.to,
            min_amount: args.min_amount,
            max_amount: args.max_amount,
            currency: args.currency,
        })
        .await;
    browser.set_page(args.page).await;

    let LoadOutcome::Applied(page) = browser.load().await.into_diagnostic()? else {
        return Err(miette!("Transaction query was superseded"));
    };

    if args.csv {
        let stdout = io::stdout();
        let mut writer = TransactionWriter::new(stdout.lock());
        writer.write_transactions(&page.data).into_diagnostic()?;
    } else {
        print!("{}", report::transaction_page(&page));
    }
    Ok(())
}
