use serde::{Deserialize, Serialize};

/// One painting in the exhibit, in catalog order. The index of a record in
/// its catalog is the stable identity the navigation core uses for focus and
/// activation; everything else here is presentation metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaintingRecord {
    pub id: String,
    pub image: String,
    pub title: String,
    pub artist: String,
    pub year: Option<i32>,
    pub description: String,
    pub sale: SaleListing,
}

/// Sale metadata carried by the source dataset. The core never reads this;
/// the detail overlay does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleListing {
    pub price: u64,
    pub for_sale: bool,
    pub auction: bool,
    pub auction_ends: Option<String>,
    pub available: bool,
    pub current_owner: Option<String>,
    pub authenticated_by: Vec<String>,
    pub seller_comments: Option<String>,
}

impl SaleListing {
    /// Listing for a painting that is displayed but not on the market.
    pub fn not_for_sale() -> Self {
        SaleListing {
            price: 0,
            for_sale: false,
            auction: false,
            auction_ends: None,
            available: false,
            current_owner: None,
            authenticated_by: Vec::new(),
            seller_comments: None,
        }
    }
}
