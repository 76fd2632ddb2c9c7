use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use mortgage_sim_core::simulation::financing::{self, FinancingInput};
use mortgage_sim_core::simulation::store::{InMemorySimulationStore, SimulationStore};

use crate::input;

/// Arguments for a single financing simulation
#[derive(Args)]
pub struct SimulateArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Client the simulation belongs to
    #[arg(long)]
    pub client_id: Option<u64>,

    /// Property price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Loan term in years
    #[arg(long)]
    pub term_years: Option<u32>,

    /// Annual interest rate in percent (e.g. 3.5)
    #[arg(long)]
    pub interest_rate: Option<Decimal>,

    /// Annual insurance rate in percent of the financed capital
    #[arg(long, default_value = "0")]
    pub insurance_rate: Decimal,

    /// Down payment
    #[arg(long, default_value = "0")]
    pub down_payment: Decimal,

    /// Month of acquisition (1-12)
    #[arg(long)]
    pub start_month: Option<u32>,

    /// Year of acquisition
    #[arg(long)]
    pub start_year: Option<i32>,

    /// Agency fee in percent of the price
    #[arg(long, default_value = "0")]
    pub agency_fee: Decimal,

    /// Notary fee in percent of the price
    #[arg(long, default_value = "0")]
    pub notary_fee: Decimal,

    /// Renovation works financed with the purchase
    #[arg(long, default_value = "0")]
    pub renovation: Decimal,

    /// Expected yearly appreciation of the property in percent
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub appreciation: Decimal,
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let financing_input: FinancingInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        FinancingInput {
            client_id: args.client_id,
            term_years: args
                .term_years
                .ok_or("--term-years is required (or provide --input)")?,
            property_price: args.price.ok_or("--price is required (or provide --input)")?,
            interest_rate_pct: args
                .interest_rate
                .ok_or("--interest-rate is required (or provide --input)")?,
            insurance_rate_pct: args.insurance_rate,
            down_payment: args.down_payment,
            start_month: args
                .start_month
                .ok_or("--start-month is required (or provide --input)")?,
            start_year: args
                .start_year
                .ok_or("--start-year is required (or provide --input)")?,
            agency_fee_pct: args.agency_fee,
            notary_fee_pct: args.notary_fee,
            renovation_cost: args.renovation,
            appreciation_pct: args.appreciation,
        }
    };

    tracing::info!(
        client_id = ?financing_input.client_id,
        price = %financing_input.property_price,
        term_years = financing_input.term_years,
        "simulation requested"
    );

    let output = financing::simulate_financing(&financing_input)?;
    log_computed(&output.result);
    for warning in &output.warnings {
        tracing::warn!("{warning}");
    }

    Ok(serde_json::to_value(output)?)
}

/// Arguments for a batch of simulations saved to a session store
#[derive(Args)]
pub struct BatchArgs {
    /// Path to a JSON file holding an array of simulation inputs
    #[arg(long)]
    pub input: Option<String>,

    /// Only print the simulations saved for this client
    #[arg(long)]
    pub client_id: Option<u64>,
}

pub fn run_batch(args: BatchArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs: Vec<FinancingInput> = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for batch".into());
    };

    tracing::info!(count = inputs.len(), "batch simulation requested");

    let store = InMemorySimulationStore::new();
    let mut warnings: Vec<String> = Vec::new();

    for (idx, financing_input) in inputs.iter().enumerate() {
        let output = financing::simulate_financing(financing_input)
            .map_err(|e| format!("input #{}: {}", idx + 1, e))?;
        log_computed(&output.result);
        warnings.extend(
            output
                .warnings
                .iter()
                .map(|w| format!("input #{}: {}", idx + 1, w)),
        );

        let record = store.save(output.result)?;
        tracing::info!(id = record.id, "simulation saved");
    }

    let records = match args.client_id {
        Some(client_id) => store.find_by_client(client_id)?,
        None => store.all()?,
    };
    tracing::debug!(count = records.len(), "records selected");

    Ok(json!({
        "results": records,
        "warnings": warnings,
    }))
}

fn log_computed(summary: &financing::FinancingSummary) {
    tracing::info!(
        financed_capital = %summary.financed_capital,
        monthly_payment = %summary.monthly_payment,
        minimum_income = summary.minimum_income,
        "monthly payment computed"
    );
    tracing::debug!(?summary, "full summary");
}
