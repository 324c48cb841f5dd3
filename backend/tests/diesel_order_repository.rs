//! Integration tests for the Diesel order, product and category adapters.
//!
//! The suite runs against embedded PostgreSQL so transaction rollback,
//! foreign keys and `RETURNING` behave as they do in production.

use chrono::{DateTime, TimeZone, Utc};
use orderdesk::domain::ports::{
    CategoryRepository, CategoryRepositoryError, OrderRepository, OrderRepositoryError,
    ProductRepository, ProductRepositoryError,
};
use orderdesk::domain::{
    Category, CategoryName, InvoiceNumber, OrderId, Price, PricedLine, PricedOrder, Product,
    ProductDraft, ProductId, ProductName, Quantity,
};
use orderdesk::outbound::persistence::{
    DbPool, DieselCategoryRepository, DieselOrderRepository, DieselProductRepository, PoolConfig,
};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use rstest::{fixture, rstest};
use rust_decimal::Decimal;
use tokio::runtime::Runtime;

mod support;

use support::{
    count_rows, handle_cluster_setup_failure, provision_template_database, shared_cluster_handle,
};

struct TestContext {
    runtime: Runtime,
    categories: DieselCategoryRepository,
    products: DieselProductRepository,
    orders: DieselOrderRepository,
    database_url: String,
    _database: TemporaryDatabase,
}

impl TestContext {
    fn seed_category(&self, name: &str) -> Category {
        let name = CategoryName::new(name).expect("valid category name");
        self.runtime
            .block_on(self.categories.create(&name))
            .expect("category insert succeeds")
    }

    fn seed_product(&self, name: &str, cents: i64, category: &Category) -> Product {
        let draft = ProductDraft {
            name: ProductName::new(name).expect("valid product name"),
            price: Price::new(Decimal::new(cents, 2)).expect("positive price"),
            category_id: category.id,
        };
        self.runtime
            .block_on(self.products.create(&draft))
            .expect("product insert succeeds")
    }

    fn rows(&self, table: &str) -> i64 {
        count_rows(&self.database_url, table).expect("row count")
    }
}

fn placed_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn line(product_id: ProductId, quantity: i32, subtotal_cents: i64) -> PricedLine {
    PricedLine {
        product_id,
        quantity: Quantity::new(quantity).expect("positive quantity"),
        subtotal: Decimal::new(subtotal_cents, 2),
    }
}

fn priced_order(lines: Vec<PricedLine>) -> PricedOrder {
    PricedOrder {
        order_date: placed_at(),
        total_price: lines.iter().map(|line| line.subtotal).sum(),
        lines,
    }
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster_handle().map_err(|err| err.to_string())?;
    let temp_db = provision_template_database(cluster)?;
    let database_url = temp_db.url().to_string();

    let config = PoolConfig::new(database_url.as_str())
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(async { DbPool::new(config).await })
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        runtime,
        categories: DieselCategoryRepository::new(pool.clone()),
        products: DieselProductRepository::new(pool.clone()),
        orders: DieselOrderRepository::new(pool),
        database_url,
        _database: temp_db,
    })
}

#[fixture]
fn repo_context() -> Option<TestContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

#[rstest]
fn missing_product_on_a_later_line_rolls_back_the_order(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: missing_product_on_a_later_line_rolls_back_the_order skipped");
        return;
    };
    let electronics = context.seed_category("Electronics");
    let laptop = context.seed_product("Laptop", 150_000, &electronics);

    let order = priced_order(vec![
        line(laptop.id, 1, 150_000),
        line(ProductId::new(laptop.id.get() + 1_000), 2, 2_000),
    ]);
    let result = context
        .runtime
        .block_on(context.orders.create_order_with_details(&order));

    assert_eq!(
        result.expect_err("second line violates the product foreign key"),
        OrderRepositoryError::missing_product()
    );
    assert_eq!(context.rows("orders"), 0, "header must roll back");
    assert_eq!(context.rows("order_details"), 0, "first line must roll back");
}

#[rstest]
fn invoice_update_is_visible_to_both_reads(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: invoice_update_is_visible_to_both_reads skipped");
        return;
    };
    let electronics = context.seed_category("Electronics");
    let books = context.seed_category("Books");
    let laptop = context.seed_product("Laptop", 150_000, &electronics);
    let novel = context.seed_product("Novel", 1_250, &books);

    let created = context
        .runtime
        .block_on(context.orders.create_order_with_details(&priced_order(vec![
            line(novel.id, 4, 5_000),
            line(laptop.id, 2, 300_000),
        ])))
        .expect("order insert succeeds");
    assert!(created.invoice_number.is_none());
    assert_eq!(created.total_price, Decimal::new(305_000, 2));

    let invoice = InvoiceNumber::for_order(created.id, created.order_date);
    let updated_at = context
        .runtime
        .block_on(context.orders.update_order_invoice(created.id, &invoice))
        .expect("invoice update succeeds");
    assert!(updated_at >= created.updated_at);

    let found = context
        .runtime
        .block_on(context.orders.find_by_id(created.id))
        .expect("find succeeds")
        .expect("order exists");
    assert_eq!(found.invoice_number.as_ref(), Some(&invoice));
    assert_eq!(found.updated_at, updated_at);
    assert_eq!(found.created_at, created.created_at);
    assert_eq!(found.order_date, placed_at());

    let lines: Vec<_> = found
        .details
        .iter()
        .map(|detail| {
            let product = detail.product.as_ref().expect("product is attached");
            let category = product.category.as_ref().expect("category is attached");
            (
                product.name.as_str().to_owned(),
                category.name.as_str().to_owned(),
                detail.quantity.get(),
            )
        })
        .collect();
    assert_eq!(
        lines,
        vec![
            ("Novel".to_owned(), "Books".to_owned(), 4),
            ("Laptop".to_owned(), "Electronics".to_owned(), 2),
        ],
        "details keep submission order"
    );

    let listed = context
        .runtime
        .block_on(context.orders.list_all())
        .expect("list succeeds");
    assert_eq!(listed, vec![found]);
}

#[rstest]
fn invoice_update_for_a_missing_order_is_not_found(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: invoice_update_for_a_missing_order_is_not_found skipped");
        return;
    };
    let id = OrderId::new(4_242);
    let invoice = InvoiceNumber::for_order(id, placed_at());

    let result = context
        .runtime
        .block_on(context.orders.update_order_invoice(id, &invoice));

    assert_eq!(
        result.expect_err("no row to update"),
        OrderRepositoryError::not_found(4_242)
    );
}

#[rstest]
fn referenced_rows_cannot_be_deleted(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: referenced_rows_cannot_be_deleted skipped");
        return;
    };
    let electronics = context.seed_category("Electronics");
    let laptop = context.seed_product("Laptop", 150_000, &electronics);
    let order = context
        .runtime
        .block_on(
            context
                .orders
                .create_order_with_details(&priced_order(vec![line(laptop.id, 1, 150_000)])),
        )
        .expect("order insert succeeds");

    let product_delete = context.runtime.block_on(context.products.delete(laptop.id));
    assert_eq!(
        product_delete.expect_err("order detail still points at the product"),
        ProductRepositoryError::referenced()
    );
    let category_delete = context
        .runtime
        .block_on(context.categories.delete(electronics.id));
    assert_eq!(
        category_delete.expect_err("product still points at the category"),
        CategoryRepositoryError::referenced()
    );
    assert_eq!(context.rows("products"), 1);
    assert_eq!(context.rows("categories"), 1);

    let released = context.runtime.block_on(async {
        context.orders.delete(order.id).await.expect("order delete");
        context.products.delete(laptop.id).await.expect("product delete")
    });
    assert!(released, "product is free once its order is gone");
    assert_eq!(context.rows("order_details"), 0, "details cascade with the order");
}
