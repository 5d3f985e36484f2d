use super::ui;
use crate::core::recommend::{Recommendation, Recommender};
use crate::core::request::InvestmentRequest;
use anyhow::Result;
use comfy_table::Cell;

impl Recommendation {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();

        table.set_header(vec![
            ui::header_cell("Stock"),
            ui::header_cell("Weightage (%)"),
            ui::header_cell("Investment Amount"),
            ui::header_cell("Stock Value"),
            ui::header_cell("Number of Stocks"),
        ]);

        for record in &self.allocations {
            table.add_row(vec![
                Cell::new(&record.security_name),
                ui::number_cell(format!("{:.2}", record.weight_percent)),
                ui::number_cell(format!("{:.2}", record.investment_amount)),
                ui::format_optional_cell(record.unit_price.value(), |p| format!("{p:.2}")),
                ui::number_cell(record.share_count.to_string()),
            ]);
        }

        let request = &self.request;
        let mut output = format!(
            "Recommended Stocks ({} risk, {} term)\n{}\n\n",
            ui::style_text(&request.risk_tier.to_string(), ui::StyleType::Title),
            request.tenure,
            ui::style_text(self.fund_url.as_str(), ui::StyleType::Subtle)
        );

        if self.allocations.is_empty() {
            output.push_str("The fund did not disclose any weighted holdings.");
            return output;
        }

        output.push_str(&table.to_string());

        output.push_str(&format!(
            "\n\n{}: {:.2}",
            ui::style_text("Amount to invest", ui::StyleType::TotalLabel),
            request.investable_amount
        ));
        output.push_str(&format!(
            "\n{}: {}",
            ui::style_text("Amount spent", ui::StyleType::TotalLabel),
            ui::style_text(
                &format!("{:.2}", self.total_spent()),
                ui::StyleType::TotalValue
            )
        ));

        let unpriced = self.unpriced_count();
        if unpriced > 0 {
            output.push_str(&format!(
                "\n{}",
                ui::style_text(
                    &format!("{unpriced} stock(s) without a current price were not bought"),
                    ui::StyleType::Error
                )
            ));
        }

        output
    }
}

pub async fn run(recommender: &Recommender<'_>, request: &InvestmentRequest) -> Result<()> {
    let pb = ui::new_spinner("Fetching fund holdings and prices...");
    let result = recommender
        .recommend_with_progress(request, &|| pb.inc(1))
        .await;
    pb.finish_and_clear();

    println!("{}", result?.display_as_table());
    Ok(())
}
