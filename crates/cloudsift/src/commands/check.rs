use cloudsift_core::Filter;
use colored::Colorize;

pub fn handle(filter: &Filter, types: &[String]) -> anyhow::Result<()> {
    let included = filter.is_included(types);
    let excluded = filter.is_excluded(types);

    println!("リソースタイプ: {}", types.join(", ").cyan());
    println!("  include: {}", yes_no(included));
    println!("  exclude: {}", yes_no(excluded));

    if included && !excluded {
        println!("{}", "✓ 処理対象です".green().bold());
    } else {
        println!("{}", "✗ 処理対象外です".yellow().bold());
    }

    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
