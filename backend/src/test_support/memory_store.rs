//! In-memory relational store backing all three repository ports.
//!
//! Enforces the same constraints the PostgreSQL schema declares: unique
//! category names, unique `(name, category_id)` products, restrictive foreign
//! keys on products and order lines, and cascading deletion of order lines.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::ports::{
    CategoryRepository, CategoryRepositoryError, OrderRepository, OrderRepositoryError,
    ProductRepository, ProductRepositoryError,
};
use crate::domain::{
    Category, CategoryId, CategoryName, InvoiceNumber, Order, OrderDetail, OrderDetailId, OrderId,
    Price, PricedOrder, Product, ProductDraft, ProductId, ProductName, Quantity,
};

#[derive(Clone)]
struct ProductRecord {
    name: ProductName,
    price: Price,
    category_id: i64,
}

#[derive(Clone)]
struct OrderRecord {
    invoice_number: Option<InvoiceNumber>,
    order_date: DateTime<Utc>,
    total_price: Decimal,
    updated_at: DateTime<Utc>,
}

#[derive(Clone)]
struct DetailRecord {
    order_id: i64,
    product_id: i64,
    quantity: Quantity,
    subtotal: Decimal,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct Tables {
    categories: BTreeMap<i64, CategoryName>,
    products: BTreeMap<i64, ProductRecord>,
    orders: BTreeMap<i64, OrderRecord>,
    details: BTreeMap<i64, DetailRecord>,
    last_id: i64,
    fail_invoice_updates: bool,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn category(&self, id: i64) -> Option<Category> {
        self.categories.get(&id).map(|name| Category {
            id: CategoryId::new(id),
            name: name.clone(),
        })
    }

    fn product(&self, id: i64) -> Option<Product> {
        self.products.get(&id).map(|record| Product {
            id: ProductId::new(id),
            name: record.name.clone(),
            price: record.price,
            category_id: CategoryId::new(record.category_id),
            category: self.category(record.category_id),
        })
    }

    fn order(&self, id: i64) -> Option<Order> {
        let record = self.orders.get(&id)?;
        let details = self
            .details
            .iter()
            .filter(|(_, detail)| detail.order_id == id)
            .map(|(detail_id, detail)| OrderDetail {
                id: OrderDetailId::new(*detail_id),
                order_id: OrderId::new(id),
                product_id: ProductId::new(detail.product_id),
                quantity: detail.quantity,
                subtotal: detail.subtotal,
                product: self.product(detail.product_id),
                created_at: detail.created_at,
                updated_at: detail.created_at,
            })
            .collect();
        Some(Order {
            id: OrderId::new(id),
            invoice_number: record.invoice_number.clone(),
            order_date: record.order_date,
            total_price: record.total_price,
            details,
            created_at: record.order_date,
            updated_at: record.updated_at,
        })
    }

    fn category_name_taken(&self, name: &CategoryName, excluding: Option<i64>) -> bool {
        self.categories
            .iter()
            .any(|(id, existing)| Some(*id) != excluding && existing == name)
    }

    fn product_name_taken(&self, name: &ProductName, category_id: i64, excluding: Option<i64>) -> bool {
        self.products.iter().any(|(id, existing)| {
            Some(*id) != excluding && existing.category_id == category_id && &existing.name == name
        })
    }
}

/// Shared in-memory tables. Clones observe the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make invoice assignment fail with a connection error.
    pub fn fail_invoice_updates(&self, fail: bool) {
        self.lock().fail_invoice_updates = fail;
    }

    /// Number of stored orders.
    pub fn order_count(&self) -> usize {
        self.lock().orders.len()
    }

    /// Number of stored order lines.
    pub fn detail_count(&self) -> usize {
        self.lock().details.len()
    }

    /// Number of stored categories.
    pub fn category_count(&self) -> usize {
        self.lock().categories.len()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn create(&self, name: &CategoryName) -> Result<Category, CategoryRepositoryError> {
        let mut tables = self.lock();
        if tables.category_name_taken(name, None) {
            return Err(CategoryRepositoryError::duplicate_name(name.as_str()));
        }
        let id = tables.next_id();
        tables.categories.insert(id, name.clone());
        Ok(Category {
            id: CategoryId::new(id),
            name: name.clone(),
        })
    }

    async fn list_all(&self) -> Result<Vec<Category>, CategoryRepositoryError> {
        let tables = self.lock();
        Ok(tables
            .categories
            .keys()
            .filter_map(|id| tables.category(*id))
            .collect())
    }

    async fn find_by_id(
        &self,
        id: CategoryId,
    ) -> Result<Option<Category>, CategoryRepositoryError> {
        Ok(self.lock().category(id.get()))
    }

    async fn update(
        &self,
        id: CategoryId,
        name: &CategoryName,
    ) -> Result<Option<Category>, CategoryRepositoryError> {
        let mut tables = self.lock();
        if !tables.categories.contains_key(&id.get()) {
            return Ok(None);
        }
        if tables.category_name_taken(name, Some(id.get())) {
            return Err(CategoryRepositoryError::duplicate_name(name.as_str()));
        }
        tables.categories.insert(id.get(), name.clone());
        Ok(tables.category(id.get()))
    }

    async fn delete(&self, id: CategoryId) -> Result<bool, CategoryRepositoryError> {
        let mut tables = self.lock();
        if tables
            .products
            .values()
            .any(|product| product.category_id == id.get())
        {
            return Err(CategoryRepositoryError::referenced());
        }
        Ok(tables.categories.remove(&id.get()).is_some())
    }

    async fn name_exists(
        &self,
        name: &CategoryName,
        excluding: Option<CategoryId>,
    ) -> Result<bool, CategoryRepositoryError> {
        Ok(self
            .lock()
            .category_name_taken(name, excluding.map(CategoryId::get)))
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn create(&self, draft: &ProductDraft) -> Result<Product, ProductRepositoryError> {
        let mut tables = self.lock();
        let category_id = draft.category_id.get();
        if !tables.categories.contains_key(&category_id) {
            return Err(ProductRepositoryError::missing_category());
        }
        if tables.product_name_taken(&draft.name, category_id, None) {
            return Err(ProductRepositoryError::duplicate_name(draft.name.as_str()));
        }
        let id = tables.next_id();
        tables.products.insert(
            id,
            ProductRecord {
                name: draft.name.clone(),
                price: draft.price,
                category_id,
            },
        );
        tables
            .product(id)
            .ok_or_else(|| ProductRepositoryError::query("inserted product vanished"))
    }

    async fn list_all(&self) -> Result<Vec<Product>, ProductRepositoryError> {
        let tables = self.lock();
        Ok(tables
            .products
            .keys()
            .filter_map(|id| tables.product(*id))
            .collect())
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, ProductRepositoryError> {
        Ok(self.lock().product(id.get()))
    }

    async fn update(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Option<Product>, ProductRepositoryError> {
        let mut tables = self.lock();
        let category_id = draft.category_id.get();
        if !tables.products.contains_key(&id.get()) {
            return Ok(None);
        }
        if !tables.categories.contains_key(&category_id) {
            return Err(ProductRepositoryError::missing_category());
        }
        if tables.product_name_taken(&draft.name, category_id, Some(id.get())) {
            return Err(ProductRepositoryError::duplicate_name(draft.name.as_str()));
        }
        tables.products.insert(
            id.get(),
            ProductRecord {
                name: draft.name.clone(),
                price: draft.price,
                category_id,
            },
        );
        Ok(tables.product(id.get()))
    }

    async fn delete(&self, id: ProductId) -> Result<bool, ProductRepositoryError> {
        let mut tables = self.lock();
        if tables
            .details
            .values()
            .any(|detail| detail.product_id == id.get())
        {
            return Err(ProductRepositoryError::referenced());
        }
        Ok(tables.products.remove(&id.get()).is_some())
    }

    async fn name_exists_in_category(
        &self,
        name: &ProductName,
        category_id: CategoryId,
        excluding: Option<ProductId>,
    ) -> Result<bool, ProductRepositoryError> {
        Ok(self
            .lock()
            .product_name_taken(name, category_id.get(), excluding.map(ProductId::get)))
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn create_order_with_details(
        &self,
        order: &PricedOrder,
    ) -> Result<Order, OrderRepositoryError> {
        let mut tables = self.lock();
        if order
            .lines
            .iter()
            .any(|line| !tables.products.contains_key(&line.product_id.get()))
        {
            return Err(OrderRepositoryError::missing_product());
        }

        let order_id = tables.next_id();
        tables.orders.insert(
            order_id,
            OrderRecord {
                invoice_number: None,
                order_date: order.order_date,
                total_price: order.total_price,
                updated_at: order.order_date,
            },
        );
        let mut details = Vec::with_capacity(order.lines.len());
        for line in &order.lines {
            let detail_id = tables.next_id();
            tables.details.insert(
                detail_id,
                DetailRecord {
                    order_id,
                    product_id: line.product_id.get(),
                    quantity: line.quantity,
                    subtotal: line.subtotal,
                    created_at: order.order_date,
                },
            );
            details.push(OrderDetail {
                id: OrderDetailId::new(detail_id),
                order_id: OrderId::new(order_id),
                product_id: line.product_id,
                quantity: line.quantity,
                subtotal: line.subtotal,
                product: None,
                created_at: order.order_date,
                updated_at: order.order_date,
            });
        }

        Ok(Order {
            id: OrderId::new(order_id),
            invoice_number: None,
            order_date: order.order_date,
            total_price: order.total_price,
            details,
            created_at: order.order_date,
            updated_at: order.order_date,
        })
    }

    async fn update_order_invoice(
        &self,
        id: OrderId,
        invoice: &InvoiceNumber,
    ) -> Result<DateTime<Utc>, OrderRepositoryError> {
        let mut tables = self.lock();
        if tables.fail_invoice_updates {
            return Err(OrderRepositoryError::connection("connection reset"));
        }
        let record = tables
            .orders
            .get_mut(&id.get())
            .ok_or_else(|| OrderRepositoryError::not_found(id.get()))?;
        record.invoice_number = Some(invoice.clone());
        record.updated_at = Utc::now();
        Ok(record.updated_at)
    }

    async fn list_all(&self) -> Result<Vec<Order>, OrderRepositoryError> {
        let tables = self.lock();
        Ok(tables
            .orders
            .keys()
            .filter_map(|id| tables.order(*id))
            .collect())
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, OrderRepositoryError> {
        Ok(self.lock().order(id.get()))
    }

    async fn delete(&self, id: OrderId) -> Result<bool, OrderRepositoryError> {
        let mut tables = self.lock();
        if tables.orders.remove(&id.get()).is_none() {
            return Ok(false);
        }
        tables.details.retain(|_, detail| detail.order_id != id.get());
        Ok(true)
    }
}
