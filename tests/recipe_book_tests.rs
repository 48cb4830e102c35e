use recipe_scaler::recipe_scaler::{ScaledIngredient, ScaledQuantity};
use recipe_scaler::recipe_store::{Ingredient, Quantity, Recipe};
use recipe_scaler::storage::{DirectoryStore, KeyValueStore, RECIPE_STATE_KEY, RECIPE_TEMPLATES_KEY};
use recipe_scaler::{RecipeBook, RecipeError};
use std::fs;
use tempfile::{tempdir, TempDir};

fn setup_test_book() -> (TempDir, RecipeBook<DirectoryStore>) {
    let dir = tempdir().expect("temp dir");
    let book = RecipeBook::open(DirectoryStore::new(dir.path()));
    (dir, book)
}

fn scenario_a() -> Recipe {
    let mut recipe = Recipe::new();
    recipe.push(Ingredient::amount("Мука", "200", "г")).unwrap();
    recipe.push(Ingredient::to_taste("Соль")).unwrap();
    recipe
}

fn add_scenario_a(book: &mut RecipeBook<DirectoryStore>) {
    book.add_ingredient("Мука", "200", "г").unwrap();
    book.add_ingredient("Соль", "", "").unwrap();
}

#[test]
fn test_scenario_a_and_b() {
    let (_dir, mut book) = setup_test_book();
    add_scenario_a(&mut book);
    assert_eq!(book.recipe(), &scenario_a());

    let scaled = book.scale_by_ratio(2.0).unwrap();
    assert_eq!(
        scaled.ingredients,
        vec![
            ScaledIngredient {
                name: "Мука".to_string(),
                quantity: ScaledQuantity::Amount { value: 400.0, unit: "г".to_string() },
            },
            ScaledIngredient { name: "Соль".to_string(), quantity: ScaledQuantity::ToTaste },
        ]
    );
    // Scaling is a derived view only.
    assert_eq!(book.recipe(), &scenario_a());
}

#[test]
fn test_scenario_c() {
    let (_dir, mut book) = setup_test_book();
    book.add_ingredient("Мука", "200", "г").unwrap();
    let scaled = book.scale_by_portions(4.0, 6.0).unwrap();
    assert_eq!(scaled.ratio, 1.5);
    assert_eq!(scaled.ingredients[0].to_string(), "Мука 300 г");
}

#[test]
fn test_scenario_d_template_copy_is_independent() {
    let (_dir, mut book) = setup_test_book();
    add_scenario_a(&mut book);
    book.save_template("base").unwrap();

    book.load_template("base").unwrap();
    book.remove_ingredient("Мука").unwrap();
    book.add_ingredient("Сахар", "10", "г").unwrap();

    book.load_template("base").unwrap();
    assert_eq!(book.recipe(), &scenario_a());
}

#[test]
fn test_scenario_e_empty_template_rejected() {
    let (dir, mut book) = setup_test_book();
    assert!(matches!(book.save_template("x"), Err(RecipeError::EmptyRecipe)));
    assert!(book.list_templates().is_empty());
    assert!(!dir.path().join("recipeTemplates.json").exists());
}

#[test]
fn test_state_survives_reopen() {
    let dir = tempdir().unwrap();
    {
        let mut book = RecipeBook::open(DirectoryStore::new(dir.path()));
        add_scenario_a(&mut book);
        book.rename_recipe("Оладьи").unwrap();
        book.save_template("base").unwrap();
        book.save_template("alt").unwrap();
    }

    let book = RecipeBook::open(DirectoryStore::new(dir.path()));
    assert_eq!(book.recipe(), &scenario_a());
    assert_eq!(book.title(), "Оладьи");
    assert_eq!(book.list_templates(), vec!["alt", "base"]);
}

#[test]
fn test_persisted_layout_is_plain_json() {
    let (dir, mut book) = setup_test_book();
    add_scenario_a(&mut book);
    book.save_template("base").unwrap();

    let state = fs::read_to_string(dir.path().join("recipeState.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&state).unwrap();
    assert_eq!(
        value,
        serde_json::json!([
            {"name": "Мука", "count": "200", "type": "г"},
            {"name": "Соль", "count": "по вкусу", "type": ""}
        ])
    );

    let templates = fs::read_to_string(dir.path().join("recipeTemplates.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&templates).unwrap();
    assert_eq!(value["base"][1]["count"], "по вкусу");
}

#[test]
fn test_reads_state_written_by_other_clients() {
    let dir = tempdir().unwrap();
    let mut store = DirectoryStore::new(dir.path());
    store
        .set(RECIPE_STATE_KEY, r#"[{"name":"Молоко","count":500,"type":"мл"},{"name":"Соль","count":"по вкусу","type":""}]"#)
        .unwrap();
    store
        .set(RECIPE_TEMPLATES_KEY, r#"{"утро":[{"name":"Овсянка","count":"50","type":"г"}]}"#)
        .unwrap();

    let book = RecipeBook::open(store);
    assert_eq!(
        book.recipe().get("Молоко").unwrap().quantity,
        Quantity::Amount { amount: "500".to_string(), unit: "мл".to_string() }
    );
    let scaled = book.scale_by_ratio(0.5).unwrap();
    assert_eq!(scaled.ingredients[0].to_string(), "Молоко 250 мл");
    assert_eq!(book.list_templates(), vec!["утро"]);
}

#[test]
fn test_corrupt_files_degrade_to_empty_state() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("recipeState.json"), "[{\"name\": 1}]").unwrap();
    fs::write(dir.path().join("recipeTemplates.json"), "garbage").unwrap();

    let mut book = RecipeBook::open(DirectoryStore::new(dir.path()));
    assert!(book.recipe().is_empty());
    assert!(book.list_templates().is_empty());

    // The next mutation overwrites the corrupt snapshot.
    book.add_ingredient("Вода", "1", "л").unwrap();
    let reopened = RecipeBook::open(DirectoryStore::new(dir.path()));
    assert_eq!(reopened.recipe().len(), 1);
}

#[test]
fn test_clear_and_remove_template() {
    let (_dir, mut book) = setup_test_book();
    add_scenario_a(&mut book);
    book.save_template("base").unwrap();
    book.clear_recipe().unwrap();
    assert!(book.recipe().is_empty());

    assert!(book.remove_template("base").unwrap());
    assert!(matches!(book.load_template("base"), Err(RecipeError::NotFound(_))));
}

#[tokio::test]
async fn test_import_file_lines() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pancakes.txt");
    tokio::fs::write(
        &path,
        "мука 200 г\nмолоко 0,5 л\nсоль по вкусу\nщепотка счастья\nмука 300 г\nяйца 0 шт\n",
    )
    .await
    .unwrap();

    let content = tokio::fs::read_to_string(&path).await.unwrap();
    let mut book = RecipeBook::open(DirectoryStore::new(dir.path().join("data")));
    let skipped = book.import_lines(&content);

    let lines: Vec<usize> = skipped.iter().map(|(line, _)| *line).collect();
    assert_eq!(lines, vec![4, 5, 6]);
    assert!(matches!(skipped[0].1, RecipeError::Parse(_)));
    assert!(matches!(skipped[1].1, RecipeError::DuplicateName(ref n) if n == "мука"));
    assert!(matches!(skipped[2].1, RecipeError::InvalidQuantity(_)));

    let scaled = book.scale_by_ratio(3.0).unwrap();
    let lines: Vec<String> = scaled.ingredients.iter().map(|i| i.to_string()).collect();
    assert_eq!(lines, vec!["мука 600 г", "молоко 1.5 л", "соль по вкусу"]);

    // Accepted lines were written through.
    let reopened = RecipeBook::open(DirectoryStore::new(dir.path().join("data")));
    assert_eq!(reopened.recipe().len(), 3);
}

#[test]
fn test_state_with_invalid_counts_opens_empty() {
    let dir = tempdir().unwrap();
    let mut store = DirectoryStore::new(dir.path());
    store
        .set(
            RECIPE_STATE_KEY,
            r#"[{"name":"Мука","count":"200","type":"г"},{"name":"Яйца","count":"0","type":"шт"},{"name":"Сахар","count":"-5","type":"г"}]"#,
        )
        .unwrap();

    let mut book = RecipeBook::open(store);
    assert!(book.recipe().is_empty());
    book.add_ingredient("Мука", "200", "г").unwrap();
    assert_eq!(book.scale_by_ratio(2.0).unwrap().ingredients[0].to_string(), "Мука 400 г");
}
