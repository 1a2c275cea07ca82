use apexx::cli::OutputFormat;
use apexx::core::strategy::DebtStrategy;
use apexx::{AppCommand, run_command};
use std::fs;
use tempfile::NamedTempFile;

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_mock_server(quotes: &[(&str, f64)]) -> MockServer {
        let mock_server = MockServer::start().await;

        for (symbol, price) in quotes {
            let body = format!(
                r#"{{
                    "chart": {{
                        "result": [{{
                            "meta": {{
                                "regularMarketPrice": {price},
                                "currency": "USD",
                                "shortName": "{symbol} Inc."
                            }}
                        }}]
                    }}
                }}"#
            );
            Mock::given(method("GET"))
                .and(path(format!("/v8/finance/chart/{symbol}")))
                .respond_with(ResponseTemplate::new(200).set_body_string(body))
                .mount(&mock_server)
                .await;
        }

        mock_server
    }

    pub fn write_config(content: &str) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        std::fs::write(config_file.path(), content).expect("Failed to write config file");
        config_file
    }
}

const LOANS_CONFIG: &str = r#"
loans:
  - id: "cc"
    name: "Credit Card"
    kind: credit
    current_balance: 1000
    interest_rate: 20
    minimum_payment: 50
  - id: "car"
    name: "Car Loan"
    kind: auto
    current_balance: 5000
    interest_rate: 5
    minimum_payment: 150
  - id: "underwater"
    name: "Underwater"
    current_balance: 10000
    interest_rate: 24
    minimum_payment: 150
    active: false
currency: "USD"
"#;

async fn run_with(config: &NamedTempFile, command: AppCommand) -> anyhow::Result<()> {
    run_command(command, config.path().to_str(), OutputFormat::Table).await
}

#[test_log::test(tokio::test)]
async fn test_loan_commands_succeed() {
    let config = test_utils::write_config(LOANS_CONFIG);

    let commands = vec![
        AppCommand::Loans,
        AppCommand::Project {
            loan_id: "cc".to_string(),
            extra: 100.0,
        },
        AppCommand::Project {
            loan_id: "underwater".to_string(),
            extra: 0.0,
        },
        AppCommand::Strategy {
            strategy: DebtStrategy::Avalanche,
            extra: 200.0,
        },
        AppCommand::Strategy {
            strategy: DebtStrategy::Snowball,
            extra: 0.0,
        },
        AppCommand::Advise {
            amount: 400.0,
            expected_return: None,
        },
        AppCommand::Outlook {
            monthly_investment: 300.0,
            expected_return: Some(6.0),
            years: 5,
        },
        AppCommand::Pay {
            loan_id: "car".to_string(),
            amount: 500.0,
        },
    ];

    for command in commands {
        let result = run_with(&config, command.clone()).await;
        assert!(
            result.is_ok(),
            "{command:?} failed with: {:?}",
            result.err()
        );
    }
}

#[test_log::test(tokio::test)]
async fn test_json_output_succeeds() {
    let config = test_utils::write_config(LOANS_CONFIG);

    let result = run_command(
        AppCommand::Advise {
            amount: 1000.0,
            expected_return: Some(7.0),
        },
        config.path().to_str(),
        OutputFormat::Json,
    )
    .await;
    assert!(result.is_ok(), "Advise failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_invalid_amounts_are_rejected() {
    let config = test_utils::write_config(LOANS_CONFIG);

    let err = run_with(
        &config,
        AppCommand::Advise {
            amount: -10.0,
            expected_return: None,
        },
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("must not be negative"));

    let err = run_with(
        &config,
        AppCommand::Project {
            loan_id: "cc".to_string(),
            extra: f64::NAN,
        },
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("finite"));
}

#[test_log::test(tokio::test)]
async fn test_outlook_rejects_excessive_years() {
    let config = test_utils::write_config(LOANS_CONFIG);

    let err = run_with(
        &config,
        AppCommand::Outlook {
            monthly_investment: 100.0,
            expected_return: None,
            years: 400_000_000,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "Years must be at most 100, got 400000000");

    let result = run_with(
        &config,
        AppCommand::Outlook {
            monthly_investment: 100.0,
            expected_return: None,
            years: 100,
        },
    )
    .await;
    assert!(result.is_ok(), "Outlook failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_unknown_loan_is_an_error() {
    let config = test_utils::write_config(LOANS_CONFIG);

    let err = run_with(
        &config,
        AppCommand::Pay {
            loan_id: "boat".to_string(),
            amount: 100.0,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "Loan not found: boat");
}

#[test_log::test(tokio::test)]
async fn test_missing_config_file() {
    let result = run_command(
        AppCommand::Loans,
        Some("/nonexistent/apexx/config.yaml"),
        OutputFormat::Table,
    )
    .await;
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("Failed to read config file")
    );
}

#[test_log::test(tokio::test)]
async fn test_invalid_loan_in_config() {
    let config = test_utils::write_config(
        r#"
loans:
  - id: "cc"
    name: "Credit Card"
    current_balance: 1000
    interest_rate: 20
    minimum_payment: 0
"#,
    );

    let err = run_with(&config, AppCommand::Loans).await.unwrap_err();
    assert!(format!("{err:#}").contains("invalid minimum payment"));
}

#[test_log::test(tokio::test)]
async fn test_full_portfolio_flow_with_mock() {
    let mock_server = test_utils::create_mock_server(&[("AAPL", 175.5), ("SPY", 445.6)]).await;

    let config_file = NamedTempFile::new().expect("Failed to create temp file");
    let config_content = format!(
        r#"
        portfolios:
          - name: "Brokerage"
            holdings:
              - symbol: "AAPL"
                shares: 10
                average_cost: 150
              - symbol: "spy"
                shares: 2
                average_cost: 400
              - symbol: "SPY"
                shares: 1
                average_cost: 430
              - symbol: "GONE"
                shares: 3
                average_cost: 20
                last_price: 18.5
        providers:
          yahoo:
            base_url: {}
        currency: "USD"
    "#,
        mock_server.uri()
    );
    fs::write(config_file.path(), &config_content).expect("Failed to write config file");

    let result = run_command(
        AppCommand::Portfolio,
        config_file.path().to_str(),
        OutputFormat::Table,
    )
    .await;
    assert!(
        result.is_ok(),
        "Portfolio command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_portfolio_values_against_mock_provider() {
    use apexx::core::cache::Cache;
    use apexx::core::config::AppConfig;
    use apexx::providers::YahooFinanceProvider;
    use std::sync::Arc;

    let mock_server = test_utils::create_mock_server(&[("AAPL", 175.5)]).await;
    let config = AppConfig::from_yaml(
        r#"
portfolios:
  - name: "Tech"
    holdings:
      - symbol: "AAPL"
        shares: 10
        average_cost: 150
      - symbol: "MISSING"
        shares: 4
        average_cost: 25
"#,
    )
    .unwrap();

    let provider = YahooFinanceProvider::new(&mock_server.uri(), Arc::new(Cache::new()));
    let values = apexx::cli::portfolio::valuate(&config.portfolios, &provider).await;

    let tech = &values[0];
    assert_eq!(tech.holdings[0].price, 175.5);
    assert_eq!(tech.holdings[0].short_name.as_deref(), Some("AAPL Inc."));
    // Unmocked symbol returns 404 and falls back to the average cost
    assert_eq!(tech.holdings[1].price, 25.0);
    assert!(tech.holdings[1].error.is_some());
    assert_eq!(tech.total_value, 1855.0);
    assert_eq!(tech.total_cost, 1600.0);
}
