use cloudsift_core::Filter;
use colored::Colorize;

pub fn handle(filter: &Filter) -> anyhow::Result<()> {
    let groups = filter.targets_types_with_ids();

    if groups.is_empty() {
        println!("{}", "ターゲットは指定されていません".yellow());
        return Ok(());
    }

    let mut types: Vec<_> = groups.keys().collect();
    types.sort();

    for ty in types {
        println!("{}", ty.cyan().bold());
        for id in &groups[ty] {
            println!("  - {}", id);
        }
    }

    Ok(())
}
