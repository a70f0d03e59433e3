// src/services/inventory_service.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination::Pagination},
    db::{LocationRepository, ProductRecord, ProductRepository, TransactionRepository},
    models::{
        inventory::{InventoryTransaction, Movement, MovementOutcome, NewInventoryTransaction, TransactionType},
        product::{Product, ProductResponse},
    },
};

// ---
// Movement rules (no I/O)
// ---

/// Input checks that need no stored state.
pub fn validate_movement(movement: &Movement) -> Result<(), AppError> {
    match movement {
        Movement::Receive(cmd) if cmd.quantity <= 0 => Err(AppError::NonPositiveQuantity),
        Movement::Issue(cmd) if cmd.quantity <= 0 => Err(AppError::NonPositiveQuantity),
        Movement::Transfer(cmd) if cmd.quantity <= 0 => Err(AppError::NonPositiveQuantity),
        Movement::Adjust(cmd) if cmd.new_quantity < 0 => Err(AppError::NegativeQuantity),
        _ => Ok(()),
    }
}

/// Checks the business rules against the loaded product, mutates it, and returns
/// the audit row to append. On error the product is left untouched.
///
/// Transfer relocates the product record as a whole. Its quantity is checked
/// against stock and written to the log, but the product quantity is not changed:
/// a product has a single location, so there is no per-location balance to move.
pub fn apply_movement(
    movement: &Movement,
    product: &mut Product,
    user_id: Uuid,
) -> Result<NewInventoryTransaction, AppError> {
    validate_movement(movement)?;

    let product_id = product.id;
    let entry = |transaction_type, quantity, from_location_id, to_location_id, notes: &str| {
        NewInventoryTransaction {
            product_id,
            transaction_type,
            quantity,
            from_location_id,
            to_location_id,
            user_id,
            notes: notes.to_string(),
        }
    };

    match movement {
        Movement::Receive(cmd) => {
            // Exact sum: the IN row records the full quantity
            let received = product
                .quantity
                .checked_add(cmd.quantity)
                .ok_or(AppError::QuantityOverflow {
                    requested: cmd.quantity,
                    available: product.quantity,
                })?;
            let record = entry(TransactionType::In, cmd.quantity, None, cmd.location_id, &cmd.notes);
            product.quantity = received;
            if let Some(location_id) = cmd.location_id {
                product.location_id = Some(location_id);
            }
            Ok(record)
        }
        Movement::Issue(cmd) => {
            if product.quantity < cmd.quantity {
                return Err(AppError::InsufficientStock {
                    requested: cmd.quantity,
                    available: product.quantity,
                });
            }
            // Source is where the product sits before the issue
            let record = entry(TransactionType::Out, cmd.quantity, product.location_id, None, &cmd.notes);
            product.apply_delta(-cmd.quantity);
            Ok(record)
        }
        Movement::Adjust(cmd) => {
            let delta = cmd.new_quantity - product.quantity;
            let record = entry(TransactionType::Adjust, delta, None, None, &cmd.notes);
            product.quantity = cmd.new_quantity;
            Ok(record)
        }
        Movement::Transfer(cmd) => {
            if product.location_id != Some(cmd.from_location_id) {
                return Err(AppError::NotAtSourceLocation);
            }
            if product.quantity < cmd.quantity {
                return Err(AppError::InsufficientStockAtSource {
                    requested: cmd.quantity,
                    available: product.quantity,
                });
            }
            let record = entry(
                TransactionType::Transfer,
                cmd.quantity,
                Some(cmd.from_location_id),
                Some(cmd.to_location_id),
                &cmd.notes,
            );
            product.location_id = Some(cmd.to_location_id);
            Ok(record)
        }
    }
}

// ---
// Service
// ---

#[derive(Clone)]
pub struct InventoryService {
    product_repo: ProductRepository,
    location_repo: LocationRepository,
    transaction_repo: TransactionRepository,
    pool: PgPool,
}

impl InventoryService {
    pub fn new(
        product_repo: ProductRepository,
        location_repo: LocationRepository,
        transaction_repo: TransactionRepository,
        pool: PgPool,
    ) -> Self {
        Self { product_repo, location_repo, transaction_repo, pool }
    }

    /// Runs one movement: product update and log row commit together or not at all.
    pub async fn execute(&self, movement: Movement, user_id: Uuid) -> Result<MovementOutcome, AppError> {
        // 1. Shape checks, before touching the database
        validate_movement(&movement)?;

        // 2. Start the transaction and lock the product row
        let mut tx = self.pool.begin().await?;

        let mut product = self
            .product_repo
            .find_by_id_for_update(&mut *tx, movement.product_id())
            .await?
            .ok_or(AppError::ProductNotFound)?;

        // 3. The destination must exist
        if let Some(location_id) = movement.destination() {
            self.location_repo
                .find_by_id(&mut *tx, location_id)
                .await?
                .ok_or(AppError::LocationNotFound)?;
        }

        // 4. Business rules + in-memory mutation
        let entry = apply_movement(&movement, &mut product, user_id)?;

        // 5. Persist product and log row in the same transaction
        let product = self
            .product_repo
            .update(&mut *tx, product.id, &ProductRecord::from(&product))
            .await?
            .ok_or(AppError::ProductNotFound)?;

        let transaction = self.transaction_repo.create(&mut *tx, &entry).await?;

        tx.commit().await?;

        tracing::info!(
            product_id = %product.id,
            transaction_id = %transaction.id,
            kind = ?movement.transaction_type(),
            quantity = transaction.quantity,
            stock = product.quantity,
            "inventory movement recorded"
        );

        Ok(MovementOutcome {
            product: ProductResponse::from(product),
            transaction,
        })
    }

    // --- Transaction log queries ---

    pub async fn get_transaction(&self, id: Uuid) -> Result<InventoryTransaction, AppError> {
        self.transaction_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::TransactionNotFound)
    }

    pub async fn list_transactions(&self, page: Pagination) -> Result<Vec<InventoryTransaction>, AppError> {
        self.transaction_repo.list(&self.pool, page).await
    }

    pub async fn product_transactions(
        &self,
        product_id: Uuid,
        page: Pagination,
    ) -> Result<Vec<InventoryTransaction>, AppError> {
        self.transaction_repo.list_by_product(&self.pool, product_id, page).await
    }

    pub async fn user_transactions(
        &self,
        user_id: Uuid,
        page: Pagination,
    ) -> Result<Vec<InventoryTransaction>, AppError> {
        self.transaction_repo.list_by_user(&self.pool, user_id, page).await
    }

    pub async fn transactions_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        page: Pagination,
    ) -> Result<Vec<InventoryTransaction>, AppError> {
        if start > end {
            return Err(AppError::InvalidDateRange);
        }
        self.transaction_repo.list_by_date_range(&self.pool, start, end, page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        inventory::{AdjustStock, IssueStock, ReceiveStock, TransferStock},
        product::test_product,
    };
    use proptest::prelude::*;

    fn receive(product: &Product, quantity: i32, location_id: Option<Uuid>) -> Movement {
        Movement::Receive(ReceiveStock {
            product_id: product.id,
            quantity,
            location_id,
            notes: "delivery".into(),
        })
    }

    fn issue(product: &Product, quantity: i32) -> Movement {
        Movement::Issue(IssueStock { product_id: product.id, quantity, notes: String::new() })
    }

    fn adjust(product: &Product, new_quantity: i32) -> Movement {
        Movement::Adjust(AdjustStock { product_id: product.id, new_quantity, notes: "count".into() })
    }

    fn transfer(product: &Product, quantity: i32, from: Uuid, to: Uuid) -> Movement {
        Movement::Transfer(TransferStock {
            product_id: product.id,
            quantity,
            from_location_id: from,
            to_location_id: to,
            notes: String::new(),
        })
    }

    #[test]
    fn receive_adds_stock_and_relocates() {
        let user = Uuid::new_v4();
        let dock = Uuid::new_v4();
        let mut product = test_product(5, None);

        let record = apply_movement(&receive(&product, 7, Some(dock)), &mut product, user).unwrap();

        assert_eq!(product.quantity, 12);
        assert_eq!(product.location_id, Some(dock));
        assert_eq!(record.transaction_type, TransactionType::In);
        assert_eq!(record.quantity, 7);
        assert_eq!(record.to_location_id, Some(dock));
        assert_eq!(record.from_location_id, None);
        assert_eq!(record.user_id, user);
        assert_eq!(record.product_id, product.id);
        assert_eq!(record.notes, "delivery");
    }

    #[test]
    fn receive_past_integer_limit_fails_without_mutation() {
        let dock = Uuid::new_v4();
        let mut product = test_product(i32::MAX - 1, None);

        let err = apply_movement(&receive(&product, 10, Some(dock)), &mut product, Uuid::new_v4()).unwrap_err();

        assert!(matches!(err, AppError::QuantityOverflow { requested: 10, available } if available == i32::MAX - 1));
        assert_eq!(product.quantity, i32::MAX - 1);
        assert_eq!(product.location_id, None);
    }

    #[test]
    fn receive_up_to_integer_limit_is_exact() {
        let mut product = test_product(i32::MAX - 1, None);
        let record = apply_movement(&receive(&product, 1, None), &mut product, Uuid::new_v4()).unwrap();
        assert_eq!(product.quantity, i32::MAX);
        assert_eq!(record.quantity, 1);
    }

    #[test]
    fn receive_without_location_keeps_current_one() {
        let shelf = Uuid::new_v4();
        let mut product = test_product(0, Some(shelf));

        let record = apply_movement(&receive(&product, 3, None), &mut product, Uuid::new_v4()).unwrap();

        assert_eq!(product.location_id, Some(shelf));
        assert_eq!(record.to_location_id, None);
    }

    #[test]
    fn non_positive_quantities_are_rejected_before_any_change() {
        let mut product = test_product(5, Some(Uuid::new_v4()));
        let before = product.clone();
        let from = product.location_id.unwrap();

        for movement in [
            receive(&product, 0, None),
            issue(&product, -1),
            transfer(&product, 0, from, Uuid::new_v4()),
        ] {
            let err = apply_movement(&movement, &mut product, Uuid::new_v4()).unwrap_err();
            assert!(matches!(err, AppError::NonPositiveQuantity));
        }
        assert_eq!(product.quantity, before.quantity);
        assert_eq!(product.location_id, before.location_id);
    }

    #[test]
    fn issue_beyond_stock_fails_without_mutation() {
        let mut product = test_product(3, None);

        let err = apply_movement(&issue(&product, 4), &mut product, Uuid::new_v4()).unwrap_err();

        assert!(matches!(err, AppError::InsufficientStock { requested: 4, available: 3 }));
        assert_eq!(product.quantity, 3);
    }

    #[test]
    fn issue_of_entire_stock_reaches_zero() {
        let mut product = test_product(3, None);
        apply_movement(&issue(&product, 3), &mut product, Uuid::new_v4()).unwrap();
        assert_eq!(product.quantity, 0);
    }

    #[test]
    fn adjust_sets_absolute_quantity_and_logs_signed_delta() {
        let mut product = test_product(6, None);

        let record = apply_movement(&adjust(&product, 0), &mut product, Uuid::new_v4()).unwrap();
        assert_eq!(product.quantity, 0);
        assert_eq!(record.transaction_type, TransactionType::Adjust);
        assert_eq!(record.quantity, -6);

        let record = apply_movement(&adjust(&product, 0), &mut product, Uuid::new_v4()).unwrap();
        assert_eq!(record.quantity, 0);

        let record = apply_movement(&adjust(&product, 25), &mut product, Uuid::new_v4()).unwrap();
        assert_eq!(product.quantity, 25);
        assert_eq!(record.quantity, 25);
    }

    #[test]
    fn adjust_to_negative_fails() {
        let mut product = test_product(6, None);
        let err = apply_movement(&adjust(&product, -1), &mut product, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, AppError::NegativeQuantity));
        assert_eq!(product.quantity, 6);
    }

    #[test]
    fn transfer_from_wrong_location_fails() {
        let here = Uuid::new_v4();
        let elsewhere = Uuid::new_v4();
        let mut product = test_product(10, Some(here));

        let err = apply_movement(&transfer(&product, 1, elsewhere, Uuid::new_v4()), &mut product, Uuid::new_v4())
            .unwrap_err();

        assert!(matches!(err, AppError::NotAtSourceLocation));
        assert_eq!(product.location_id, Some(here));
    }

    #[test]
    fn transfer_of_unlocated_product_fails() {
        let mut product = test_product(10, None);
        let err = apply_movement(
            &transfer(&product, 1, Uuid::new_v4(), Uuid::new_v4()),
            &mut product,
            Uuid::new_v4(),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::NotAtSourceLocation));
    }

    #[test]
    fn transfer_beyond_stock_fails() {
        let here = Uuid::new_v4();
        let mut product = test_product(2, Some(here));
        let err = apply_movement(&transfer(&product, 3, here, Uuid::new_v4()), &mut product, Uuid::new_v4())
            .unwrap_err();
        assert!(matches!(err, AppError::InsufficientStockAtSource { requested: 3, available: 2 }));
        assert_eq!(product.location_id, Some(here));
    }

    /// Transfer moves the product record, not stock: quantity is validated and
    /// logged but stays the same on the product.
    #[test]
    fn transfer_relocates_but_leaves_quantity_unchanged() {
        let l1 = Uuid::new_v4();
        let l2 = Uuid::new_v4();
        let mut product = test_product(8, Some(l1));

        let record = apply_movement(&transfer(&product, 5, l1, l2), &mut product, Uuid::new_v4()).unwrap();

        assert_eq!(product.quantity, 8);
        assert_eq!(product.location_id, Some(l2));
        assert_eq!(record.transaction_type, TransactionType::Transfer);
        assert_eq!(record.quantity, 5);
        assert_eq!(record.from_location_id, Some(l1));
        assert_eq!(record.to_location_id, Some(l2));
    }

    #[test]
    fn issue_then_transfer_scenario() {
        let l1 = Uuid::new_v4();
        let l2 = Uuid::new_v4();
        let user = Uuid::new_v4();
        let mut product = test_product(10, Some(l1));

        let out = apply_movement(&issue(&product, 4), &mut product, user).unwrap();
        assert_eq!(product.quantity, 6);
        assert_eq!(out.transaction_type, TransactionType::Out);
        assert_eq!(out.quantity, 4);
        assert_eq!(out.from_location_id, Some(l1));
        assert_eq!(out.to_location_id, None);

        let moved = apply_movement(&transfer(&product, 4, l1, l2), &mut product, user).unwrap();
        assert_eq!(product.location_id, Some(l2));
        assert_eq!(product.quantity, 6);
        assert_eq!(moved.quantity, 4);
        assert_eq!(moved.from_location_id, Some(l1));
        assert_eq!(moved.to_location_id, Some(l2));
    }

    proptest! {
        /// Any mix of receive/issue keeps stock non-negative, and a rejected
        /// issue leaves it untouched.
        #[test]
        fn receive_issue_sequence_never_goes_negative(
            start in 0i32..1_000,
            ops in proptest::collection::vec((any::<bool>(), 1i32..500), 0..40)
        ) {
            let mut product = test_product(start, None);
            for (is_receive, quantity) in ops {
                let before = product.quantity;
                let movement = if is_receive { receive(&product, quantity, None) } else { issue(&product, quantity) };
                match apply_movement(&movement, &mut product, Uuid::new_v4()) {
                    Ok(record) => {
                        prop_assert_eq!(record.quantity, quantity);
                        let expected = if is_receive { before + quantity } else { before - quantity };
                        prop_assert_eq!(product.quantity, expected);
                    }
                    Err(AppError::InsufficientStock { .. }) => {
                        prop_assert!(!is_receive);
                        prop_assert_eq!(product.quantity, before);
                    }
                    Err(other) => prop_assert!(false, "unexpected error: {}", other),
                }
                prop_assert!(product.quantity >= 0);
            }
        }
    }
}

/// Runs `execute` against a migrated database (one fresh database per test).
#[cfg(test)]
mod execute_tests {
    use super::*;
    use crate::{
        db::UserRepository,
        models::{
            inventory::{IssueStock, ReceiveStock, TransferStock},
            location::CreateLocationPayload,
        },
    };
    use rust_decimal::Decimal;

    fn service(pool: &PgPool) -> InventoryService {
        InventoryService::new(
            ProductRepository::new(),
            LocationRepository::new(),
            TransactionRepository::new(),
            pool.clone(),
        )
    }

    async fn seed_user(pool: &PgPool) -> Uuid {
        UserRepository::new()
            .create_user(pool, "clerk", "clerk@example.com", "$2b$04$not-a-real-hash")
            .await
            .unwrap()
            .id
    }

    async fn seed_location(pool: &PgPool, code: &str) -> Uuid {
        let payload = CreateLocationPayload {
            name: format!("Shelf {code}"),
            code: code.to_string(),
            description: String::new(),
            building: "A".into(),
            floor: "1".into(),
            aisle: String::new(),
            shelf: code.to_string(),
        };
        LocationRepository::new().create(pool, &payload).await.unwrap().id
    }

    async fn seed_product(pool: &PgPool, quantity: i32, location_id: Option<Uuid>) -> Uuid {
        let record = ProductRecord {
            sku: "BOLT-M8",
            barcode: None,
            name: "Hex bolt M8",
            description: None,
            quantity,
            min_quantity: 2,
            price: Decimal::new(35, 2),
            location_id,
        };
        ProductRepository::new().create(pool, &record).await.unwrap().id
    }

    async fn reload(pool: &PgPool, id: Uuid) -> Product {
        ProductRepository::new().find_by_id(pool, id).await.unwrap().unwrap()
    }

    async fn log_for(pool: &PgPool, product_id: Uuid) -> Vec<InventoryTransaction> {
        TransactionRepository::new()
            .list_by_product(pool, product_id, Pagination::default())
            .await
            .unwrap()
    }

    #[sqlx::test]
    async fn receive_commits_product_and_exactly_one_log_row(pool: PgPool) {
        let user = seed_user(&pool).await;
        let l1 = seed_location(&pool, "L1").await;
        let l2 = seed_location(&pool, "L2").await;
        let product_id = seed_product(&pool, 10, Some(l1)).await;

        let outcome = service(&pool)
            .execute(
                Movement::Receive(ReceiveStock { product_id, quantity: 5, location_id: Some(l2), notes: "po-17".into() }),
                user,
            )
            .await
            .unwrap();

        assert_eq!(outcome.product.product.quantity, 15);
        assert_eq!(outcome.transaction.transaction_type, TransactionType::In);

        let stored = reload(&pool, product_id).await;
        assert_eq!(stored.quantity, 15);
        assert_eq!(stored.location_id, Some(l2));

        let log = log_for(&pool, product_id).await;
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].id, outcome.transaction.id);
        assert_eq!(log[0].quantity, 5);
        assert_eq!(log[0].to_location_id, Some(l2));
        assert_eq!(log[0].user_id, user);
        assert_eq!(log[0].notes, "po-17");
    }

    #[sqlx::test]
    async fn failed_issue_leaves_stock_and_log_untouched(pool: PgPool) {
        let user = seed_user(&pool).await;
        let product_id = seed_product(&pool, 3, None).await;

        let err = service(&pool)
            .execute(Movement::Issue(IssueStock { product_id, quantity: 5, notes: String::new() }), user)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InsufficientStock { requested: 5, available: 3 }));
        assert_eq!(reload(&pool, product_id).await.quantity, 3);
        assert!(log_for(&pool, product_id).await.is_empty());
    }

    #[sqlx::test]
    async fn transfer_to_unknown_location_is_not_found_and_writes_nothing(pool: PgPool) {
        let user = seed_user(&pool).await;
        let l1 = seed_location(&pool, "L1").await;
        let product_id = seed_product(&pool, 8, Some(l1)).await;

        let err = service(&pool)
            .execute(
                Movement::Transfer(TransferStock {
                    product_id,
                    quantity: 2,
                    from_location_id: l1,
                    to_location_id: Uuid::new_v4(),
                    notes: String::new(),
                }),
                user,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::LocationNotFound));
        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
        assert_eq!(reload(&pool, product_id).await.location_id, Some(l1));
        assert!(log_for(&pool, product_id).await.is_empty());
    }

    #[sqlx::test]
    async fn receive_into_unknown_location_is_not_found(pool: PgPool) {
        let user = seed_user(&pool).await;
        let product_id = seed_product(&pool, 1, None).await;

        let err = service(&pool)
            .execute(
                Movement::Receive(ReceiveStock {
                    product_id,
                    quantity: 4,
                    location_id: Some(Uuid::new_v4()),
                    notes: String::new(),
                }),
                user,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::LocationNotFound));
        assert_eq!(reload(&pool, product_id).await.quantity, 1);
        assert!(log_for(&pool, product_id).await.is_empty());
    }

    #[sqlx::test]
    async fn unknown_product_is_not_found(pool: PgPool) {
        let user = seed_user(&pool).await;

        let err = service(&pool)
            .execute(
                Movement::Issue(IssueStock { product_id: Uuid::new_v4(), quantity: 1, notes: String::new() }),
                user,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ProductNotFound));
    }

    #[sqlx::test]
    async fn receive_overflow_rolls_back(pool: PgPool) {
        let user = seed_user(&pool).await;
        let product_id = seed_product(&pool, i32::MAX - 1, None).await;

        let err = service(&pool)
            .execute(
                Movement::Receive(ReceiveStock { product_id, quantity: 10, location_id: None, notes: String::new() }),
                user,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::QuantityOverflow { .. }));
        assert_eq!(reload(&pool, product_id).await.quantity, i32::MAX - 1);
        assert!(log_for(&pool, product_id).await.is_empty());
    }

    #[sqlx::test]
    async fn issue_then_transfer_is_logged_newest_first(pool: PgPool) {
        let user = seed_user(&pool).await;
        let l1 = seed_location(&pool, "L1").await;
        let l2 = seed_location(&pool, "L2").await;
        let product_id = seed_product(&pool, 10, Some(l1)).await;
        let inventory = service(&pool);

        inventory
            .execute(Movement::Issue(IssueStock { product_id, quantity: 4, notes: String::new() }), user)
            .await
            .unwrap();
        inventory
            .execute(
                Movement::Transfer(TransferStock {
                    product_id,
                    quantity: 4,
                    from_location_id: l1,
                    to_location_id: l2,
                    notes: String::new(),
                }),
                user,
            )
            .await
            .unwrap();

        let stored = reload(&pool, product_id).await;
        assert_eq!(stored.quantity, 6);
        assert_eq!(stored.location_id, Some(l2));

        let log = log_for(&pool, product_id).await;
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].transaction_type, TransactionType::Transfer);
        assert_eq!((log[0].from_location_id, log[0].to_location_id), (Some(l1), Some(l2)));
        assert_eq!(log[1].transaction_type, TransactionType::Out);
        assert_eq!(log[1].from_location_id, Some(l1));

        let by_user = inventory.user_transactions(user, Pagination::default()).await.unwrap();
        assert_eq!(by_user.len(), 2);
    }
}
