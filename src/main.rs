use clap::Parser;
use mortgage_cost::core::calculator;
use mortgage_cost::utils::logger;
use mortgage_cost::{CalcError, CliConfig, LoanQuote};

fn fail(e: &CalcError) -> ! {
    tracing::error!(
        "❌ Calculation failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

fn print_quote(quote: &LoanQuote) {
    println!("Principal:        {:.2}", quote.principal);
    println!("Annual rate:      {}%", quote.annual_rate_percent);
    println!("Term:             {} years ({} payments)", quote.years, quote.years * 12);
    println!("Monthly payment:  {:.2}", quote.monthly_payment);
    println!("Total interest:   {:.2}", quote.total_interest);
    println!("Total loan cost:  {:.2}", quote.total_cost);

    if let Some(schedule) = &quote.schedule {
        println!();
        println!(
            "{:>5} {:>12} {:>12} {:>12} {:>14}",
            "month", "payment", "interest", "principal", "balance"
        );
        for row in schedule {
            println!(
                "{:>5} {:>12.2} {:>12.2} {:>12.2} {:>14.2}",
                row.month, row.payment, row.interest, row.principal, row.balance
            );
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);
    tracing::debug!("CLI config: {:?}", config);

    let terms = match config.terms() {
        Ok(terms) => terms,
        Err(e) => {
            tracing::error!("❌ Input validation failed: {}", e);
            fail(&e);
        }
    };

    let quote = match calculator::quote("cli", &terms, config.schedule) {
        Ok(quote) => quote,
        Err(e) => fail(&e),
    };

    tracing::info!(
        "Computed total cost {:.2} over {} months",
        quote.total_cost,
        terms.months()
    );

    if config.json {
        println!("{}", serde_json::to_string_pretty(&quote)?);
    } else {
        print_quote(&quote);
    }

    Ok(())
}
