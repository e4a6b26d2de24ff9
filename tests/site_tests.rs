use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;

use typedoc_site::preview::{render_label, ReturnsView};
use typedoc_site::{
    loader, parse, resolve, Dataset, PreviewBuilder, PrimitiveSet, Resolution, SiteConfig,
    SiteGenerator, TypeLabel,
};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/shop.json")
}

fn shop() -> Dataset {
    loader::load_file(fixture()).unwrap()
}

#[test]
fn loads_generated_payload() {
    let dataset = shop();
    assert_eq!(dataset.api.len(), 1);
    assert_eq!(dataset.docs.len(), 1);
    assert_eq!(dataset.types.len(), 4);

    let endpoint = &dataset.api[0];
    assert_eq!(endpoint.args["customer_id"].color.as_deref(), Some("#22C55E"));
    assert_eq!(
        endpoint.json_body,
        Some(serde_json::json!({"customer_id": "c-1", "items": []}))
    );
}

#[test]
fn order_fields_resolve() {
    let dataset = shop();
    let catalog = dataset.catalog();
    let primitives = PrimitiveSet::default();
    let order = catalog.get("Order").unwrap();
    let customer = catalog.get("Customer").unwrap();

    let field = |def: &typedoc_site::TypeDefinition, name: &str| {
        parse(&def.fields[name].declared_type)
    };

    assert_eq!(
        resolve(&field(order, "customer"), &catalog, &primitives),
        Resolution::Resolved(customer)
    );
    let items = field(order, "items");
    assert!(items.is_list());
    assert_eq!(
        resolve(&items, &catalog, &primitives),
        Resolution::Resolved(catalog.get("LineItem").unwrap())
    );
    // The payload defines a type named `str`; the built-in still wins.
    assert!(catalog.contains("str"));
    assert_eq!(
        resolve(&field(customer, "name"), &catalog, &primitives),
        Resolution::Primitive
    );
}

#[test]
fn self_referential_preview_terminates() {
    let dataset = shop();
    let catalog = dataset.catalog();
    let primitives = PrimitiveSet::default();
    let builder = PreviewBuilder::new(&catalog, &primitives);

    let preview = builder.preview(catalog.get("Order").unwrap());
    let parent = preview.fields.iter().find(|f| f.name == "parent").unwrap();
    assert!(matches!(
        parent.label,
        TypeLabel::Reference { preview: None, .. }
    ));
    // Still rendered as a link to the type.
    assert!(render_label(&parent.label).contains("href=\"types.html#types-order\""));
}

#[test]
fn unknown_return_type_is_neutral() {
    let dataset = shop();
    let catalog = dataset.catalog();
    let primitives = PrimitiveSet::default();
    let builder = PreviewBuilder::new(&catalog, &primitives);

    let view = builder
        .returns(dataset.docs[0].returns.as_ref().unwrap())
        .unwrap();
    assert_eq!(
        view,
        ReturnsView::Neutral {
            text: "Money".into(),
            description: "the total".into()
        }
    );
}

#[test]
fn generates_site() {
    let out = tempfile::tempdir().unwrap();
    let generator = SiteGenerator::new(shop(), SiteConfig::default()).unwrap();
    let report = generator.generate(out.path()).unwrap();

    for name in [
        "index.html",
        "api.html",
        "types.html",
        "docs.html",
        "data.json",
        "styles.css",
        "filters.js",
    ] {
        assert!(out.path().join(name).is_file(), "{name} missing");
    }
    assert_eq!(report.types, 4);

    let api = fs::read_to_string(out.path().join("api.html")).unwrap();
    assert!(api.contains("Type: Order"));
    assert!(api.contains("href=\"types.html#types-lineitem\""));
    assert!(api.contains("All Statuses"));

    let docs = fs::read_to_string(out.path().join("docs.html")).unwrap();
    assert!(docs.contains("order_total()"));
    assert!(docs.contains(">Money</span>"));

    // The written dataset reloads to the same thing.
    let reloaded = loader::load_file(out.path().join("data.json")).unwrap();
    assert_eq!(reloaded, shop());
}

#[test]
fn config_changes_titles_and_primitives() {
    let dir = tempfile::tempdir().unwrap();
    let welcome = dir.path().join("welcome.md");
    fs::write(&welcome, "# Hello shop\n\nSome *intro*.").unwrap();
    let config_path = dir.path().join("site.yaml");
    fs::write(
        &config_path,
        "title: Shop Docs\nwelcome: welcome.md\nprimitives: [int]\ntype_mappings:\n  api: Endpoints\n",
    )
    .unwrap();

    let config = SiteConfig::load(&config_path).unwrap();
    let generator = SiteGenerator::new(shop(), config).unwrap();

    let home = generator.render_page(typedoc_site::Page::Home).unwrap();
    assert!(home.contains("Shop Docs"));
    assert!(home.contains("<h1>Hello shop</h1>"));
    assert!(home.contains("Endpoints"));

    // With `str` no longer a built-in, the payload's `str` type resolves.
    let types = generator.render_page(typedoc_site::Page::Types).unwrap();
    assert!(types.contains("href=\"types.html#types-str\""));
}
