use anyhow::{Context, Result};
use recipe_scaler::cli::{parse_args, Command, ScaleArgs, TemplateCommand};
use recipe_scaler::config::Config;
use recipe_scaler::storage::DirectoryStore;
use recipe_scaler::RecipeBook;
use std::path::Path;
use tokio::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

type Book = RecipeBook<DirectoryStore>;

fn print_recipe(book: &Book) {
    println!("{}", book.title());
    if book.recipe().is_empty() {
        println!("  (no ingredients)");
    }
    for (idx, ingredient) in book.recipe().iter().enumerate() {
        println!("{:>3}. {}", idx + 1, ingredient);
    }
}

fn scale(book: &Book, args: &ScaleArgs) -> Result<()> {
    let scaled = match (args.ratio, args.from, args.to) {
        (Some(ratio), _, _) => book.scale_by_ratio(ratio)?,
        (None, Some(from), Some(to)) => {
            let scaled = book.scale_by_portions(from, to)?;
            println!("Ratio: {:.2}", scaled.ratio);
            scaled
        }
        _ => anyhow::bail!("Pass either --ratio or both --from and --to"),
    };
    println!("{}", book.export_text(&scaled));
    Ok(())
}

async fn import(book: &mut Book, file: &Path) -> Result<()> {
    let content = fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read ingredient file '{}'", file.display()))?;

    let before = book.recipe().len();
    let skipped = book.import_lines(&content);
    for (line_no, e) in &skipped {
        eprintln!("Line {}: {}", line_no, e);
    }
    let added = book.recipe().len() - before;
    println!("Imported {} ingredient(s), skipped {}.", added, skipped.len());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load();
    let cli_args = parse_args();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let data_dir = cli_args.data_dir.clone().unwrap_or(config.data_dir);
    info!(data_dir = %data_dir.display(), "opening recipe book");
    let mut book = RecipeBook::open(DirectoryStore::new(&data_dir));

    match cli_args.command {
        Command::Add { name, count, unit } => {
            book.add_ingredient(&name, count.as_deref().unwrap_or(""), unit.as_deref().unwrap_or(""))
                .with_context(|| format!("Failed to add '{}'", name))?;
            print_recipe(&book);
        }
        Command::Remove { name } => {
            book.remove_ingredient(&name)?;
            print_recipe(&book);
        }
        Command::Rename { title } => {
            book.rename_recipe(&title)?;
            println!("{}", book.title());
        }
        Command::Clear { yes } => {
            if !yes {
                anyhow::bail!("Refusing to clear the recipe without --yes");
            }
            book.clear_recipe()?;
            println!("Recipe cleared.");
        }
        Command::Show => print_recipe(&book),
        Command::Scale(args) => scale(&book, &args)?,
        Command::Say { text } => {
            let line = text.join(" ");
            let parsed = book
                .add_from_text(&line)
                .with_context(|| format!("Failed to add '{}'", line))?;
            println!("Added {}", parsed.ingredient_name);
            print_recipe(&book);
        }
        Command::Import { file } => {
            import(&mut book, &file).await?;
            print_recipe(&book);
        }
        Command::Template(TemplateCommand::Save { name }) => {
            book.save_template(&name)
                .with_context(|| format!("Failed to save template '{}'", name))?;
            println!("Template \"{}\" saved.", name.trim());
        }
        Command::Template(TemplateCommand::Load { name }) => {
            book.load_template(&name)?;
            println!("Loaded template: {}", name.trim());
            print_recipe(&book);
        }
        Command::Template(TemplateCommand::List) => {
            for name in book.list_templates() {
                println!("{}", name);
            }
        }
        Command::Template(TemplateCommand::Remove { name }) => {
            if book.remove_template(&name)? {
                println!("Template \"{}\" removed.", name.trim());
            } else {
                println!("No template named \"{}\".", name.trim());
            }
        }
    }

    Ok(())
}
