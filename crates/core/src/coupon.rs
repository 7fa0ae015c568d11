//! Coupons: the backend document, its effective status, and form validation.
//!
//! Admin coupon forms arrive as raw strings. [`CouponDraft::validate`] checks
//! every field and collects all problems at once so the form can be
//! re-rendered with a message next to each bad input.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CouponId, Price};

/// How a coupon's value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// Value is a percentage of the subtotal (0-100].
    #[default]
    Percentage,
    /// Value is a fixed amount in đồng.
    Fixed,
}

impl DiscountType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Percentage => "Phần trăm",
            Self::Fixed => "Số tiền cố định",
        }
    }
}

/// Effective state of a coupon at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponStatus {
    Active,
    Scheduled,
    Expired,
    Exhausted,
    Disabled,
}

impl CouponStatus {
    pub const ALL: [Self; 5] = [
        Self::Active,
        Self::Scheduled,
        Self::Expired,
        Self::Exhausted,
        Self::Disabled,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Scheduled => "scheduled",
            Self::Expired => "expired",
            Self::Exhausted => "exhausted",
            Self::Disabled => "disabled",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Đang hoạt động",
            Self::Scheduled => "Chưa bắt đầu",
            Self::Expired => "Hết hạn",
            Self::Exhausted => "Hết lượt dùng",
            Self::Disabled => "Đã tắt",
        }
    }
}

/// A coupon as returned by `/api/coupons`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    #[serde(rename = "_id")]
    pub id: CouponId,
    pub code: String,
    #[serde(default)]
    pub discount_type: DiscountType,
    #[serde(default, alias = "discount")]
    pub discount_value: Decimal,
    #[serde(default, alias = "minOrderAmount")]
    pub min_order_value: Price,
    #[serde(default, alias = "maxDiscount")]
    pub max_discount_amount: Option<Price>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, alias = "expiryDate")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub usage_limit: Option<u32>,
    #[serde(default)]
    pub used_count: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub description: Option<String>,
}

const fn default_active() -> bool {
    true
}

impl Coupon {
    /// Status at `now`. Disabled wins over every date or usage check.
    #[must_use]
    pub fn status_at(&self, now: DateTime<Utc>) -> CouponStatus {
        if !self.is_active {
            return CouponStatus::Disabled;
        }
        if self.start_date.is_some_and(|start| now < start) {
            return CouponStatus::Scheduled;
        }
        if self.end_date.is_some_and(|end| now > end) {
            return CouponStatus::Expired;
        }
        if self.usage_limit.is_some_and(|limit| self.used_count >= limit) {
            return CouponStatus::Exhausted;
        }
        CouponStatus::Active
    }

    /// Discount granted on `subtotal`, ignoring dates and usage.
    ///
    /// Zero below the minimum order value. Percentage discounts are capped
    /// by `max_discount_amount`; no discount exceeds the subtotal.
    #[must_use]
    pub fn discount_for(&self, subtotal: Price) -> Price {
        if subtotal < self.min_order_value || subtotal.is_negative() {
            return Price::ZERO;
        }
        let raw = match self.discount_type {
            DiscountType::Percentage => {
                let amount = subtotal.amount() * self.discount_value / Decimal::ONE_HUNDRED;
                let amount = Price::new(amount);
                self.max_discount_amount
                    .map_or(amount, |cap| amount.min(cap))
            }
            DiscountType::Fixed => Price::new(self.discount_value),
        };
        raw.min(subtotal)
    }

    /// Human-readable value, e.g. `10%` or `50.000 ₫`.
    #[must_use]
    pub fn value_display(&self) -> String {
        match self.discount_type {
            DiscountType::Percentage => format!("{}%", self.discount_value.normalize()),
            DiscountType::Fixed => Price::new(self.discount_value).display(),
        }
    }
}

/// Raw coupon form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CouponDraft {
    pub code: String,
    pub discount_type: String,
    pub discount_value: String,
    pub min_order_value: String,
    pub max_discount_amount: String,
    pub start_date: String,
    pub end_date: String,
    pub usage_limit: String,
    /// Checkbox: present (any value) when ticked.
    pub is_active: Option<String>,
    pub description: String,
}

/// Validated coupon, serialized as the create/update payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidCoupon {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub min_order_value: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_discount_amount: Option<Decimal>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_limit: Option<u32>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One message per offending form field.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("coupon form has {} invalid field(s)", .errors.len())]
pub struct CouponErrors {
    errors: Vec<(&'static str, &'static str)>,
}

impl CouponErrors {
    fn push(&mut self, field: &'static str, message: &'static str) {
        self.errors.push((field, message));
    }

    /// Message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| *message)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// `(field, message)` pairs in form order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.errors.iter().copied()
    }

    /// First message, for a summary toast.
    #[must_use]
    pub fn first_message(&self) -> &'static str {
        self.errors
            .first()
            .map_or("Dữ liệu không hợp lệ", |(_, message)| message)
    }
}

/// Accepted coupon code length.
pub const CODE_LENGTH: std::ops::RangeInclusive<usize> = 3..=20;

impl CouponDraft {
    /// Pre-fill a form from an existing coupon.
    #[must_use]
    pub fn from_coupon(coupon: &Coupon) -> Self {
        let date = |value: Option<DateTime<Utc>>| {
            value
                .map(|d| d.date_naive().format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        };
        Self {
            code: coupon.code.clone(),
            discount_type: coupon.discount_type.as_str().to_owned(),
            discount_value: coupon.discount_value.normalize().to_string(),
            min_order_value: coupon.min_order_value.amount().normalize().to_string(),
            max_discount_amount: coupon
                .max_discount_amount
                .map(|p| p.amount().normalize().to_string())
                .unwrap_or_default(),
            start_date: date(coupon.start_date),
            end_date: date(coupon.end_date),
            usage_limit: coupon
                .usage_limit
                .map(|n| n.to_string())
                .unwrap_or_default(),
            is_active: coupon.is_active.then(|| "on".to_owned()),
            description: coupon.description.clone().unwrap_or_default(),
        }
    }

    /// Check every field.
    ///
    /// # Errors
    ///
    /// Returns [`CouponErrors`] listing each invalid field.
    pub fn validate(&self) -> Result<ValidCoupon, CouponErrors> {
        let mut errors = CouponErrors::default();

        let code = self.code.trim().to_uppercase();
        if code.is_empty() {
            errors.push("code", "Vui lòng nhập mã giảm giá");
        } else if !CODE_LENGTH.contains(&code.chars().count()) {
            errors.push("code", "Mã giảm giá phải có từ 3 đến 20 ký tự");
        } else if !code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            errors.push("code", "Mã chỉ gồm chữ, số, dấu gạch ngang hoặc gạch dưới");
        }

        let discount_type = match self.discount_type.trim() {
            "percentage" | "" => DiscountType::Percentage,
            "fixed" => DiscountType::Fixed,
            _ => {
                errors.push("discount_type", "Loại giảm giá không hợp lệ");
                DiscountType::Percentage
            }
        };

        let discount_value = match parse_decimal(&self.discount_value) {
            Some(value) if value <= Decimal::ZERO => {
                errors.push("discount_value", "Giá trị giảm phải lớn hơn 0");
                value
            }
            Some(value)
                if discount_type == DiscountType::Percentage
                    && value > Decimal::ONE_HUNDRED =>
            {
                errors.push("discount_value", "Phần trăm giảm không được vượt quá 100");
                value
            }
            Some(value) => value,
            None => {
                errors.push("discount_value", "Giá trị giảm không hợp lệ");
                Decimal::ZERO
            }
        };

        let min_order_value = if self.min_order_value.trim().is_empty() {
            Decimal::ZERO
        } else {
            match parse_decimal(&self.min_order_value) {
                Some(value) if value >= Decimal::ZERO => value,
                _ => {
                    errors.push("min_order_value", "Giá trị đơn tối thiểu không hợp lệ");
                    Decimal::ZERO
                }
            }
        };

        let max_discount_amount = if self.max_discount_amount.trim().is_empty() {
            None
        } else {
            match parse_decimal(&self.max_discount_amount) {
                Some(value) if value >= Decimal::ZERO => Some(value),
                _ => {
                    errors.push("max_discount_amount", "Mức giảm tối đa không hợp lệ");
                    None
                }
            }
        };

        let start_date = parse_date(&self.start_date);
        if start_date.is_none() {
            errors.push("start_date", "Vui lòng chọn ngày bắt đầu");
        }
        let end_date = parse_date(&self.end_date);
        match (start_date, end_date) {
            (_, None) => errors.push("end_date", "Vui lòng chọn ngày kết thúc"),
            (Some(start), Some(end)) if end <= start => {
                errors.push("end_date", "Ngày kết thúc phải sau ngày bắt đầu");
            }
            _ => {}
        }

        let usage_limit = if self.usage_limit.trim().is_empty() {
            None
        } else {
            match self.usage_limit.trim().parse::<u32>() {
                Ok(limit) if limit >= 1 => Some(limit),
                _ => {
                    errors.push("usage_limit", "Số lượt dùng phải là số nguyên từ 1 trở lên");
                    None
                }
            }
        };

        match (start_date, end_date) {
            (Some(start_date), Some(end_date)) if errors.is_empty() => Ok(ValidCoupon {
                code,
                discount_type,
                discount_value,
                min_order_value,
                max_discount_amount,
                start_date,
                end_date,
                usage_limit,
                is_active: self.is_active.is_some(),
                description: Some(self.description.trim().to_owned()).filter(|d| !d.is_empty()),
            }),
            _ => Err(errors),
        }
    }
}

fn parse_decimal(input: &str) -> Option<Decimal> {
    // Thousands separators are common in VND input ("50.000" or "50,000").
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| !matches!(c, '.' | ',' | ' ' | '_'))
        .collect();
    if cleaned.is_empty() || (input.trim().contains(['.', ',']) && !looks_grouped(input.trim())) {
        return input.trim().parse().ok();
    }
    cleaned.parse().ok()
}

/// `50.000` / `1,250,000` style grouping: every group after the first has 3 digits.
fn looks_grouped(input: &str) -> bool {
    let mut groups = input.split(['.', ',']);
    let first_ok = groups
        .next()
        .is_some_and(|g| !g.is_empty() && g.len() <= 3 && g.chars().all(|c| c.is_ascii_digit()));
    first_ok && groups.all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit()))
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}
