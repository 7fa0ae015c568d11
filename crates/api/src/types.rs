//! Backend documents other than orders and coupons.
//!
//! Deserialization is lenient: the backend has grown several spellings for
//! the same field over time, and optional fields are often simply missing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeal_core::{
    BrandId, CategoryId, CommentId, ContactId, NewsId, PaymentId, PaymentStatus, Price, ProductId,
    Role, UserId,
};

/// Reference to another document: a bare ID or a populated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocRef {
    Id(String),
    Doc {
        #[serde(rename = "_id")]
        id: String,
        #[serde(default, alias = "title", alias = "username")]
        name: Option<String>,
    },
}

impl DocRef {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) | Self::Doc { id, .. } => id,
        }
    }

    /// Display name when the reference was populated.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::Doc { name, .. } => name.as_deref(),
        }
    }
}

/// An image given either as a URL string or as `{url}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageRef {
    Url(String),
    Object {
        #[serde(alias = "secure_url")]
        url: String,
    },
}

impl ImageRef {
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Url(url) | Self::Object { url } => url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Price,
    #[serde(default, alias = "discountPrice", alias = "salePrice")]
    pub sale_price: Option<Price>,
    #[serde(default, alias = "quantity", alias = "countInStock")]
    pub stock: i64,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(default)]
    pub category: Option<DocRef>,
    #[serde(default)]
    pub brand: Option<DocRef>,
    #[serde(default)]
    pub sold: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Price the customer pays: the sale price when it undercuts the list price.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        match self.sale_price {
            Some(sale) if sale > Price::ZERO && sale < self.price => sale,
            _ => self.price,
        }
    }

    #[must_use]
    pub fn on_sale(&self) -> bool {
        self.effective_price() < self.price
    }

    /// Whole-number discount percentage for sale badges.
    #[must_use]
    pub fn discount_percent(&self) -> u32 {
        use rust_decimal::prelude::ToPrimitive;

        if !self.on_sale() || self.price <= Price::ZERO {
            return 0;
        }
        let saved = (self.price - self.effective_price()).amount();
        (saved * rust_decimal::Decimal::ONE_HUNDRED / self.price.amount())
            .round()
            .to_u32()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn main_image(&self) -> Option<&str> {
        self.images.first().map(ImageRef::url)
    }

    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    #[must_use]
    pub fn category_id(&self) -> Option<&str> {
        self.category.as_ref().map(DocRef::id)
    }

    #[must_use]
    pub fn brand_id(&self) -> Option<&str> {
        self.brand.as_ref().map(DocRef::id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    #[serde(rename = "_id")]
    pub id: BrandId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
}

/// A news article. `content` is HTML produced by the admin editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct News {
    #[serde(rename = "_id")]
    pub id: NewsId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, alias = "description")]
    pub summary: Option<String>,
    #[serde(default, alias = "image")]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub author: Option<DocRef>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl News {
    /// Plain-text teaser: the summary, or the start of the content.
    #[must_use]
    pub fn excerpt(&self, max_chars: usize) -> String {
        let source = self
            .summary
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map_or_else(|| strip_tags(&self.content), str::to_owned);
        let text = source.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.chars().count() <= max_chars {
            return text;
        }
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}…", cut.trim_end())
    }
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.replace("&nbsp;", " ")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: CommentId,
    #[serde(default)]
    pub product: Option<DocRef>,
    #[serde(default)]
    pub user: Option<DocRef>,
    #[serde(default, alias = "comment")]
    pub content: String,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Comment {
    #[must_use]
    pub fn author_name(&self) -> &str {
        self.user
            .as_ref()
            .and_then(DocRef::name)
            .unwrap_or("Khách hàng")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(rename = "_id")]
    pub id: PaymentId,
    #[serde(default, alias = "orderId")]
    pub order: Option<DocRef>,
    #[serde(default)]
    pub user: Option<DocRef>,
    #[serde(default)]
    pub amount: Price,
    #[serde(default, alias = "paymentMethod")]
    pub method: Option<String>,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(rename = "_id")]
    pub id: ContactId,
    #[serde(alias = "fullName")]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    #[serde(default, alias = "name")]
    pub username: Option<String>,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

/// Home page banner from `/api/interfaces/banners`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(alias = "imageUrl")]
    pub image: String,
    #[serde(default)]
    pub link: Option<String>,
}

/// Body of `POST /api/comments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub product_id: ProductId,
    pub content: String,
    pub rating: u8,
}

/// Body of `POST /api/contacts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub message: String,
}

/// Body of `POST /api/auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_product_lenient_fields() {
        let product: Product = serde_json::from_value(json!({
            "_id": "p1",
            "name": "Áo khoác gió",
            "price": 500000,
            "discountPrice": "400000",
            "countInStock": 3,
            "images": ["https://cdn/a.jpg", {"url": "https://cdn/b.jpg"}],
            "category": {"_id": "c1", "name": "Áo"},
            "brand": "b1"
        }))
        .unwrap();

        assert_eq!(product.effective_price(), Price::from_dong(400_000));
        assert_eq!(product.discount_percent(), 20);
        assert_eq!(product.main_image(), Some("https://cdn/a.jpg"));
        assert_eq!(product.images[1].url(), "https://cdn/b.jpg");
        assert_eq!(product.category_id(), Some("c1"));
        assert_eq!(product.brand_id(), Some("b1"));
        assert!(product.in_stock());
    }

    #[test]
    fn test_sale_price_above_list_is_ignored() {
        let product: Product = serde_json::from_value(json!({
            "_id": "p2", "name": "Mũ", "price": 100000, "salePrice": 120000
        }))
        .unwrap();
        assert!(!product.on_sale());
        assert_eq!(product.discount_percent(), 0);
    }

    #[test]
    fn test_news_excerpt_strips_html() {
        let news: News = serde_json::from_value(json!({
            "_id": "n1",
            "title": "Khai trương",
            "content": "<p>Chào mừng <b>khai trương</b>&nbsp;cửa hàng mới tại Hà Nội</p>"
        }))
        .unwrap();
        assert_eq!(news.excerpt(100), "Chào mừng khai trương cửa hàng mới tại Hà Nội");
        assert_eq!(news.excerpt(9), "Chào mừng…");
    }

    #[test]
    fn test_comment_and_user_names() {
        let comment: Comment = serde_json::from_value(json!({
            "_id": "cm1",
            "user": {"_id": "u1", "username": "hoa"},
            "comment": "Đẹp",
            "rating": 5
        }))
        .unwrap();
        assert_eq!(comment.author_name(), "hoa");
        assert_eq!(comment.content, "Đẹp");

        let user: User =
            serde_json::from_value(json!({"_id": "u2", "email": "b@zeal.vn", "role": "admin"}))
                .unwrap();
        assert_eq!(user.display_name(), "b@zeal.vn");
        assert!(user.role.is_admin());
    }
}
