use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use route_verifier::domain::ServiceClass;
use route_verifier::explore::{
    OrderDetails, ReservationFallbacks, ReservationOutcome, contacts_list, count_items, reserve,
};
use route_verifier::survey::{DEFAULT_OUTPUT_PATH, SurveyConfig, verify_routes};
use route_verifier::ts::{
    Credentials, LoginSession, RawResponse, TicketClient, TicketClientConfig, TsError,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Route verification and endpoint exploration for the ticketing system.
#[derive(Parser)]
#[command(name = "route-verifier", version)]
struct Cli {
    /// Gateway base URL
    #[arg(long, env = "TS_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Login user for authenticated commands
    #[arg(long, env = "TS_USERNAME", default_value = "fdse_microservice", global = true)]
    username: String,

    /// Login password for authenticated commands
    #[arg(
        long,
        env = "TS_PASSWORD",
        default_value = "111111",
        hide_env_values = true,
        global = true
    )]
    password: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Probe every station pair on every route and generate the route tables
    Verify {
        /// Query trips this many days after today
        #[arg(long, default_value_t = 7)]
        days_ahead: i64,

        /// Query trips on this date (YYYY-MM-DD) instead
        #[arg(long)]
        date: Option<NaiveDate>,

        /// File the generated configuration is written to
        #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
        output: PathBuf,

        /// Seconds to wait for each trip query
        #[arg(long, default_value_t = 5)]
        trip_timeout: u64,
    },
    /// List all routes
    Routes,
    /// List all users
    Users,
    /// Log in and show the token
    Login,
    /// Delete a user (requires an admin login)
    DeleteUser { user_id: String },
    /// List all assurances
    Assurances,
    /// List assurance types
    AssuranceTypes,
    /// List food offered on a trip
    Foods {
        #[arg(long)]
        date: String,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        trip_id: String,
    },
    /// List the contacts of an account (defaults to the logged-in account)
    Contacts {
        #[arg(long)]
        account_id: Option<String>,
    },
    /// Reserve a high-speed (G/D) ticket
    Preserve(OrderArgs),
    /// Reserve a normal (K/T/Z) ticket
    PreserveOther(OrderArgs),
}

#[derive(Args)]
struct OrderArgs {
    /// Train number, e.g. D1345
    #[arg(long)]
    trip_id: String,
    /// Travel date (YYYY-MM-DD)
    #[arg(long)]
    date: String,
    #[arg(long)]
    from: String,
    #[arg(long)]
    to: String,
    #[arg(long, default_value = "2")]
    seat_type: String,
    /// Assurance type index, "0" for none
    #[arg(long, default_value = "0")]
    assurance: String,
    /// Food type, 0 for none
    #[arg(long, default_value_t = 0)]
    food_type: i32,
    #[arg(long, default_value = "")]
    food_name: String,
    #[arg(long, default_value_t = 0.0)]
    food_price: f64,
    /// Station the food is delivered at
    #[arg(long, default_value = "")]
    station_name: String,
    #[arg(long, default_value = "")]
    store_name: String,
    /// Account id used when the login response carries none
    #[arg(long)]
    account_id: Option<String>,
    /// Contact id used when the account lists no contacts
    #[arg(long)]
    contacts_id: Option<String>,
}

impl OrderArgs {
    fn split(self) -> (OrderDetails, ReservationFallbacks) {
        let details = OrderDetails {
            trip_id: self.trip_id,
            seat_type: self.seat_type,
            date: self.date,
            from: self.from,
            to: self.to,
            assurance: self.assurance,
            food_type: self.food_type,
            station_name: self.station_name,
            store_name: self.store_name,
            food_name: self.food_name,
            food_price: self.food_price,
        };
        let fallbacks = ReservationFallbacks {
            account_id: self.account_id,
            contacts_id: self.contacts_id,
        };
        (details, fallbacks)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries generated config and response bodies
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), BoxError> {
    let mut client_config = TicketClientConfig::default();
    if let Some(url) = &cli.base_url {
        client_config = client_config.with_base_url(url);
    }
    if let Command::Verify { trip_timeout, .. } = &cli.command {
        client_config = client_config.with_trip_timeout(*trip_timeout);
    }
    let client = TicketClient::new(client_config)?;
    let credentials = Credentials::new(cli.username, cli.password);

    match cli.command {
        Command::Verify {
            days_ahead,
            date,
            output,
            ..
        } => {
            let mut config = SurveyConfig::default()
                .with_days_ahead(days_ahead)
                .with_output_path(output);
            if let Some(date) = date {
                config = config.with_date(date);
            }

            let report = verify_routes(&client, &config, Local::now().date_naive()).await?;

            println!("{}", report.config_text);
            info!(
                date = %report.date,
                high_speed = report.count(ServiceClass::HighSpeed),
                normal = report.count(ServiceClass::Normal),
                "route tables generated"
            );
            if report.stats.failures() > 0 {
                warn!(
                    failed = report.stats.failures(),
                    timeouts = report.stats.timeouts,
                    transport = report.stats.transport_errors,
                    non_200 = report.stats.non_200,
                    malformed = report.stats.malformed,
                    "some probes failed and were recorded as no trips"
                );
            }
        }
        Command::Routes => {
            let routes = client.fetch_routes().await?;
            println!("{}", serde_json::to_string_pretty(&routes)?);
            info!(routes = routes.len(), "fetched routes");
        }
        Command::Users => {
            let response = client.users().await?;
            print_list(&response, "users");
        }
        Command::Login => {
            let response = client.login(&credentials).await?;
            print_response(&response);
            let session = LoginSession::from_response(&response)?;
            let preview: String = session.token.chars().take(50).collect();
            info!(token = %preview, user_id = ?session.user_id, "logged in");
        }
        Command::DeleteUser { user_id } => {
            let session = client.authenticate(&credentials).await?;
            let response = client.delete_user(&session.token, &user_id).await?;
            print_response(&response);
            if response.is_ok() {
                info!(%user_id, "user deleted");
            } else {
                warn!(%user_id, status = response.status, "user deletion failed");
            }
        }
        Command::Assurances => {
            let session = client.authenticate(&credentials).await?;
            let response = client.assurances(&session.token).await?;
            print_list(&response, "assurances");
        }
        Command::AssuranceTypes => {
            let session = client.authenticate(&credentials).await?;
            let response = client.assurance_types(&session.token).await?;
            print_list(&response, "assurance types");
        }
        Command::Foods {
            date,
            from,
            to,
            trip_id,
        } => {
            let response = client.foods(&date, &from, &to, &trip_id).await?;
            print_list(&response, "foods");
        }
        Command::Contacts { account_id } => {
            let session = client.authenticate(&credentials).await?;
            let account_id = account_id
                .or(session.user_id)
                .ok_or(TsError::Unresolved("account id"))?;
            let response = client.contacts(&session.token, &account_id).await?;
            print_list(&response, "contacts");
            for (i, contact) in contacts_list(&response).iter().enumerate() {
                println!(
                    "  {}. id: {}, name: {}",
                    i + 1,
                    contact.id.as_deref().unwrap_or("-"),
                    contact.name.as_deref().unwrap_or("-")
                );
            }
        }
        Command::Preserve(args) => {
            preserve(&client, &credentials, ServiceClass::HighSpeed, args).await?;
        }
        Command::PreserveOther(args) => {
            preserve(&client, &credentials, ServiceClass::Normal, args).await?;
        }
    }

    Ok(())
}

async fn preserve(
    client: &TicketClient,
    credentials: &Credentials,
    class: ServiceClass,
    args: OrderArgs,
) -> Result<(), BoxError> {
    let (details, fallbacks) = args.split();
    let reservation = reserve(client, credentials, class, details, fallbacks).await?;

    println!("{}", serde_json::to_string_pretty(&reservation.order)?);
    print_response(&reservation.response);

    match reservation.outcome {
        ReservationOutcome::Reserved { order_id } => {
            info!(order_id = order_id.as_deref().unwrap_or("-"), "reservation placed");
        }
        ReservationOutcome::Rejected { message } => {
            warn!(%message, "reservation rejected");
        }
        ReservationOutcome::Unreadable => {
            warn!("reservation response could not be read");
        }
    }
    Ok(())
}

/// Print status, content type and body (pretty JSON when it parses).
fn print_response(response: &RawResponse) {
    println!("Status: {}", response.status);
    println!(
        "Content-Type: {}",
        response.content_type.as_deref().unwrap_or("unknown")
    );

    match response.json() {
        Some(body) => match serde_json::to_string_pretty(&body) {
            Ok(pretty) => println!("{pretty}"),
            Err(_) => println!("{}", response.body),
        },
        None if response.body.is_empty() => println!("(empty body)"),
        None => println!("{}", response.body),
    }
}

fn print_list(response: &RawResponse, what: &str) {
    print_response(response);
    match count_items(response) {
        Some(n) => info!("fetched {n} {what}"),
        None => warn!(status = response.status, "no {what} list in response"),
    }
}
