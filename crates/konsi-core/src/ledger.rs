//! # Ledger Planning
//!
//! The five business operations of the consignment ledger, expressed as pure
//! planning functions: a snapshot of the touched entities goes in, a
//! validated *plan* comes out. The plan holds the fully-updated entities
//! plus the new append-only record; the store layer applies it atomically.
//!
//! ## Why Plan, Then Apply?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │              One Snapshot, One Validation, One Write                │
//! │                                                                     │
//! │  read snapshot ──► validate ──► compute ALL derived fields ──►      │
//! │  (store layer) apply plan in a single transaction                   │
//! │                                                                     │
//! │  Every derived value (new stock, new debt, record totals) is        │
//! │  computed from the SAME snapshot that passed validation. No write   │
//! │  is ever based on a re-read; a stale-read/fresh-write mismatch is   │
//! │  impossible by construction.                                        │
//! │                                                                     │
//! │  A failed plan returns Err and carries NO partial mutation: the     │
//! │  caller's entities are never touched (plans clone).                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Five Operations
//! | operation        | warehouse stock | partner inventory | debt        |
//! |------------------|-----------------|-------------------|-------------|
//! | ship_to_partner  | − qty           | (at delivery)     | + price*qty |
//! | confirm_delivery | —               | + qty             | —           |
//! | sale (direct)    | − qty           | —                 | —           |
//! | sale (partner)   | —               | − qty             | − total     |
//! | return           | + qty           | − qty             | − credit    |
//! | payment          | —               | —                 | total_paid+ |

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult, ValidationError};
use crate::money::Money;
use crate::types::{
    Distribution, DistributionStatus, Partner, Payment, PaymentMethod, Product, Return, Sale,
};
use crate::validation::{validate_positive_amount, validate_required_fields, validate_stock};

/// Generates a fresh entity id (UUID v4).
fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Maps a generic stock shortfall to the warehouse-specific error kind.
fn warehouse_shortfall(product: &Product, err: ValidationError) -> LedgerError {
    match err {
        ValidationError::InsufficientStock {
            requested,
            available,
        } => LedgerError::InsufficientWarehouseStock {
            product: product.name.clone(),
            available,
            requested,
        },
        other => other.into(),
    }
}

/// Maps a generic stock shortfall to the partner-specific error kind.
fn partner_shortfall(partner: &Partner, product: &Product, err: ValidationError) -> LedgerError {
    match err {
        ValidationError::InsufficientStock {
            requested,
            available,
        } => LedgerError::InsufficientPartnerStock {
            partner: partner.name.clone(),
            product: product.name.clone(),
            available,
            requested,
        },
        other => other.into(),
    }
}

// =============================================================================
// ShipToPartner
// =============================================================================

/// The outcome of planning a shipment: updated aggregates plus the new
/// in-transit distribution record.
#[derive(Debug, Clone)]
pub struct ShipmentPlan {
    /// Product with warehouse stock already decremented.
    pub product: Product,
    /// Partner with debt already increased by the shipment value.
    pub partner: Partner,
    /// New record, created in `InTransit`.
    pub distribution: Distribution,
}

/// Plans a shipment of consigned stock to a partner.
///
/// ## Precondition
/// `product.stock >= qty`, else [`LedgerError::InsufficientWarehouseStock`].
///
/// ## Effects (in the returned plan)
/// - warehouse stock − `qty`
/// - partner debt + `product.price * qty` (debt accrues at *shipment*)
/// - new Distribution in `InTransit`, name and price snapshotted
pub fn plan_shipment(
    product: &Product,
    partner: &Partner,
    qty: i64,
    req_date: NaiveDate,
    now: DateTime<Utc>,
) -> LedgerResult<ShipmentPlan> {
    validate_stock(qty, product.stock).map_err(|e| warehouse_shortfall(product, e))?;

    // Value is derived from the same snapshot the precondition saw.
    let value = product.unit_price().multiply_quantity(qty);

    let mut updated_product = product.clone();
    updated_product.stock -= qty;

    let mut updated_partner = partner.clone();
    updated_partner.debt += value.minor();

    let distribution = Distribution {
        id: new_id(),
        partner_id: partner.id.clone(),
        product_id: product.id.clone(),
        partner_name: partner.name.clone(),
        product_name: product.name.clone(),
        qty,
        unit_price: product.price,
        date: now,
        req_date,
        status: DistributionStatus::InTransit,
        delivered_at: None,
    };

    Ok(ShipmentPlan {
        product: updated_product,
        partner: updated_partner,
        distribution,
    })
}

// =============================================================================
// ConfirmDelivery
// =============================================================================

/// The outcome of confirming a delivery.
#[derive(Debug, Clone)]
pub struct DeliveryPlan {
    /// Partner with the shipped units added to consigned inventory.
    pub partner: Partner,
    /// Distribution marked `Delivered`.
    pub distribution: Distribution,
}

/// Plans a delivery confirmation.
///
/// ## Precondition
/// `distribution.status == InTransit`, else [`LedgerError::AlreadyDelivered`].
/// The transition is irreversible; confirming twice must fail the second
/// time without double-incrementing inventory.
///
/// ## Effects (in the returned plan)
/// - distribution status → `Delivered`, `delivered_at` set
/// - partner inventory + `qty` (stock and debt were settled at ship time)
pub fn plan_delivery(
    distribution: &Distribution,
    partner: &Partner,
    now: DateTime<Utc>,
) -> LedgerResult<DeliveryPlan> {
    if distribution.status == DistributionStatus::Delivered {
        return Err(LedgerError::AlreadyDelivered(distribution.id.clone()));
    }

    let mut updated_distribution = distribution.clone();
    updated_distribution.status = DistributionStatus::Delivered;
    updated_distribution.delivered_at = Some(now);

    let mut updated_partner = partner.clone();
    *updated_partner
        .inventory
        .entry(distribution.product_id.clone())
        .or_insert(0) += distribution.qty;

    Ok(DeliveryPlan {
        partner: updated_partner,
        distribution: updated_distribution,
    })
}

// =============================================================================
// RecordSale
// =============================================================================

/// Where a sale draws its units from.
#[derive(Debug, Clone)]
pub enum SaleSource<'a> {
    /// Direct sale from warehouse stock.
    Warehouse,
    /// Sale through a partner's consigned inventory.
    Partner(&'a Partner),
}

/// Inputs for planning a sale.
#[derive(Debug, Clone)]
pub struct SaleRequest<'a> {
    pub product: &'a Product,
    pub source: SaleSource<'a>,
    pub qty: i64,
    /// Agreed unit price; the total is always recomputed server-side.
    pub unit_price: Money,
    pub buyer_name: &'a str,
    pub payment_method: PaymentMethod,
}

/// The aggregate a sale mutated: the warehouse product or the partner.
#[derive(Debug, Clone)]
pub enum SaleEffect {
    /// Direct sale: product with stock decremented.
    Warehouse { product: Product },
    /// Partner sale: partner with inventory and debt decremented.
    Partner { partner: Partner },
}

/// The outcome of planning a sale.
#[derive(Debug, Clone)]
pub struct SalePlan {
    pub effect: SaleEffect,
    pub sale: Sale,
}

/// Plans a sale, either direct from the warehouse or through a partner.
///
/// ## Preconditions
/// - direct: `product.stock >= qty` else `InsufficientWarehouseStock`
/// - partner: `partner.inventory[product] >= qty` else
///   `InsufficientPartnerStock`
/// - `buyer_name` must be present
///
/// ## Effects (in the returned plan)
/// - direct: warehouse stock − `qty`
/// - partner: partner inventory − `qty`, partner debt − `total` (the goods
///   are no longer owed; the partner now owes cash instead, tracked via the
///   receivable)
/// - new immutable Sale with `total = unit_price * qty` and names
///   snapshotted at creation time
pub fn plan_sale(request: SaleRequest<'_>, now: DateTime<Utc>) -> LedgerResult<SalePlan> {
    validate_required_fields(&[("buyer_name", request.buyer_name)])?;

    let product = request.product;
    let total = request.unit_price.multiply_quantity(request.qty);

    let (effect, partner_id, partner_name) = match request.source {
        SaleSource::Warehouse => {
            validate_stock(request.qty, product.stock)
                .map_err(|e| warehouse_shortfall(product, e))?;

            let mut updated_product = product.clone();
            updated_product.stock -= request.qty;

            (
                SaleEffect::Warehouse {
                    product: updated_product,
                },
                None,
                None,
            )
        }
        SaleSource::Partner(partner) => {
            let held = partner.held(&product.id);
            validate_stock(request.qty, held)
                .map_err(|e| partner_shortfall(partner, product, e))?;

            let mut updated_partner = partner.clone();
            *updated_partner
                .inventory
                .entry(product.id.clone())
                .or_insert(0) -= request.qty;
            updated_partner.debt -= total.minor();

            (
                SaleEffect::Partner {
                    partner: updated_partner,
                },
                Some(partner.id.clone()),
                Some(partner.name.clone()),
            )
        }
    };

    let is_direct = partner_id.is_none();
    let sale = Sale {
        id: new_id(),
        product_id: product.id.clone(),
        partner_id,
        product_name: product.name.clone(),
        partner_name,
        buyer_name: request.buyer_name.trim().to_string(),
        qty: request.qty,
        unit_price: request.unit_price.minor(),
        total: total.minor(),
        payment_method: request.payment_method,
        is_direct,
        date: now,
    };

    Ok(SalePlan { effect, sale })
}

// =============================================================================
// RecordReturn
// =============================================================================

/// The outcome of planning a return.
#[derive(Debug, Clone)]
pub struct ReturnPlan {
    /// Product with warehouse stock restored.
    pub product: Product,
    /// Partner with inventory and debt reduced.
    pub partner: Partner,
    pub record: Return,
}

/// Plans a return of consigned goods from a partner to the warehouse.
///
/// ## Preconditions
/// - `partner.inventory[product] >= qty` else `InsufficientPartnerStock`
///   (returning more than held is rejected outright, with no state change)
/// - `reason` must be present
///
/// ## Effects (in the returned plan)
/// - warehouse stock + `qty`
/// - partner inventory − `qty`
/// - partner debt − `credit_unit_price * qty`
///
/// `credit_unit_price` is resolved by the caller per the configured
/// [`crate::settings::ReturnPricing`] policy; the default credits at the
/// product's current price.
pub fn plan_return(
    product: &Product,
    partner: &Partner,
    qty: i64,
    reason: &str,
    credit_unit_price: Money,
    now: DateTime<Utc>,
) -> LedgerResult<ReturnPlan> {
    validate_required_fields(&[("reason", reason)])?;

    let held = partner.held(&product.id);
    validate_stock(qty, held).map_err(|e| partner_shortfall(partner, product, e))?;

    let credit = credit_unit_price.multiply_quantity(qty);

    let mut updated_product = product.clone();
    updated_product.stock += qty;

    let mut updated_partner = partner.clone();
    *updated_partner
        .inventory
        .entry(product.id.clone())
        .or_insert(0) -= qty;
    updated_partner.debt -= credit.minor();

    let record = Return {
        id: new_id(),
        partner_id: partner.id.clone(),
        product_id: product.id.clone(),
        partner_name: partner.name.clone(),
        product_name: product.name.clone(),
        qty,
        reason: reason.trim().to_string(),
        credit: credit.minor(),
        date: now,
    };

    Ok(ReturnPlan {
        product: updated_product,
        partner: updated_partner,
        record,
    })
}

// =============================================================================
// RecordPayment
// =============================================================================

/// The outcome of planning a payment.
#[derive(Debug, Clone)]
pub struct PaymentPlan {
    /// Partner with `total_paid` increased.
    pub partner: Partner,
    pub record: Payment,
}

/// Plans a cash payment against a partner's receivable.
///
/// ## Precondition
/// `amount > 0`.
///
/// ## Effects (in the returned plan)
/// - partner `total_paid` + `amount`; `debt` is never touched directly
///
/// There is deliberately no upper bound against the outstanding receivable:
/// overpayment is permitted and yields a negative receivable (a partner
/// credit balance). Do not add a cap here without a product decision.
pub fn plan_payment(
    partner: &Partner,
    amount: Money,
    now: DateTime<Utc>,
) -> LedgerResult<PaymentPlan> {
    validate_positive_amount(amount.minor(), "amount")?;

    let mut updated_partner = partner.clone();
    updated_partner.total_paid += amount.minor();

    let record = Payment {
        id: new_id(),
        partner_id: partner.id.clone(),
        partner_name: partner.name.clone(),
        amount: amount.minor(),
        date: now,
    };

    Ok(PaymentPlan {
        partner: updated_partner,
        record,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
