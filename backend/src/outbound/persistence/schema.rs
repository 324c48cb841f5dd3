//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. The `diesel
//! print-schema` command can regenerate them from a live database.

diesel::table! {
    /// Product categories. `name` is unique.
    categories (id) {
        id -> Int8,
        name -> Varchar,
    }
}

diesel::table! {
    /// Products. `(name, category_id)` is unique.
    products (id) {
        id -> Int8,
        name -> Varchar,
        price -> Numeric,
        category_id -> Int8,
    }
}

diesel::table! {
    /// Order headers.
    orders (id) {
        id -> Int8,
        /// Null until the post-commit invoice update lands.
        invoice_number -> Nullable<Varchar>,
        order_date -> Timestamptz,
        total_price -> Numeric,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Order lines; deleted with their order.
    order_details (id) {
        id -> Int8,
        order_id -> Int8,
        product_id -> Int8,
        quantity -> Int4,
        subtotal -> Numeric,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(products -> categories (category_id));
diesel::joinable!(order_details -> orders (order_id));
diesel::joinable!(order_details -> products (product_id));

diesel::allow_tables_to_appear_in_same_query!(categories, products, orders, order_details);
