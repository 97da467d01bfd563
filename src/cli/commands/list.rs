use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::store::ShardStore;
use crate::store::filters::{FILTER_ALL, matches_record};
use crate::ui::messages::info;

/// List work entries or bills, filtered by year/month/company.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List {
        year,
        month,
        company,
        bills,
    } = cmd
    {
        let year_f = year.as_deref().unwrap_or(FILTER_ALL);
        let month_f = month.as_deref().unwrap_or(FILTER_ALL);
        let company_f = company.as_deref().unwrap_or(FILTER_ALL);

        let store = ShardStore::open(cfg)?;
        let mut shown = 0usize;

        if *bills {
            for key in store.bills.shard_keys()? {
                for b in store.bills.get(&key)? {
                    if matches_record(year_f, month_f, company_f, b.date, &b.description) {
                        println!(
                            "{}  {:<24} {:>10.2}  {:<9} {}",
                            b.date,
                            b.description,
                            b.amount,
                            b.category,
                            if b.category.deductible() {
                                "deductible"
                            } else {
                                ""
                            }
                        );
                        shown += 1;
                    }
                }
            }
        } else {
            for key in store.logs.shard_keys()? {
                for e in store.logs.get(&key)? {
                    if matches_record(year_f, month_f, company_f, e.date, &e.company) {
                        println!(
                            "{}  {:<24} {:>5.1}h {:>5.1}m  rate {:.2}/{}{}",
                            e.date_str(),
                            e.company,
                            e.hours,
                            e.minutes,
                            e.rate_used,
                            e.rate_unit,
                            if e.double_pay { "  (x2)" } else { "" }
                        );
                        shown += 1;
                    }
                }
            }
        }

        info(format!(
            "{} record(s) [year={year_f} month={month_f} company={company_f}]",
            shown
        ));
    }

    Ok(())
}
