use pathmap::path_parser::PathBinder;
use pathmap::sqm::SqmPath;
use pathmap::Catalog;

pub const FIXTURE_PATH: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/auction_house.yaml"
);

pub fn auction_house() -> Catalog {
    Catalog::from_file(FIXTURE_PATH).expect("fixture model should load")
}

/// Binder with `Auction a`, `Node n` and `Member m` declared
pub fn binder(catalog: &Catalog) -> PathBinder<'_> {
    let mut binder = PathBinder::new(catalog.path_sources());
    binder.add_root("Auction", "a").unwrap();
    binder.add_root("Node", "n").unwrap();
    binder.add_root("Member", "m").unwrap();
    binder
}

pub fn bind(binder: &PathBinder<'_>, expression: &str) -> SqmPath {
    binder
        .bind_str(expression)
        .unwrap_or_else(|e| panic!("failed to bind `{}`: {}", expression, e))
}
