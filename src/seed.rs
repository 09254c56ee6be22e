//! 목업 데이터
//! 프로세스가 시작될 때마다 `now` 기준으로 다시 생성된다.
use crate::bidding::model::{Bid, BidStatus, Bidder};
use crate::listing::model::{AuctionStatus, DiamondSpecs, Listing};
use crate::preference::model::PreferenceDraft;
use chrono::{DateTime, Duration, Utc};

/// 데모 구매자 (My Bids 화면의 "나")
pub const DEMO_BIDDER_ID: &str = "USR-100";

struct ListingSeed {
    id: &'static str,
    name: &'static str,
    shape: &'static str,
    carat: f64,
    color: &'static str,
    clarity: &'static str,
    cut: &'static str,
    certification: Option<&'static str>,
    asking_price: i64,
    seller: &'static str,
    status: AuctionStatus,
    age: Duration,
    remaining: Duration,
}

struct BidSeed {
    id: &'static str,
    listing_id: &'static str,
    bidder: (&'static str, &'static str, bool, f32),
    amount: i64,
    status: BidStatus,
    age: Duration,
    note: Option<&'static str>,
}

const DEMO: (&str, &str, bool, f32) = (DEMO_BIDDER_ID, "Alex Morgan", true, 4.6);

fn listing_seeds() -> Vec<ListingSeed> {
    vec![
        ListingSeed {
            id: "LST-001",
            name: "Round Brilliant 2.5ct",
            shape: "Round",
            carat: 2.5,
            color: "D",
            clarity: "VVS1",
            cut: "Excellent",
            certification: Some("GIA-2234567890"),
            asking_price: 24500,
            seller: "Diamond Elite Co.",
            status: AuctionStatus::Active,
            age: Duration::days(5),
            remaining: Duration::days(2) + Duration::hours(14),
        },
        ListingSeed {
            id: "LST-002",
            name: "Princess Cut 1.8ct",
            shape: "Princess",
            carat: 1.8,
            color: "E",
            clarity: "VS1",
            cut: "Very Good",
            certification: Some("IGI-4410238876"),
            asking_price: 18200,
            seller: "Gem Masters",
            status: AuctionStatus::EndingSoon,
            age: Duration::days(6),
            remaining: Duration::hours(4) + Duration::minutes(30),
        },
        ListingSeed {
            id: "LST-003",
            name: "Emerald Cut 3.1ct",
            shape: "Emerald",
            carat: 3.1,
            color: "F",
            clarity: "VVS2",
            cut: "Excellent",
            certification: Some("GIA-1187345521"),
            asking_price: 42800,
            seller: "Crown Diamonds",
            status: AuctionStatus::Locked,
            age: Duration::days(9),
            remaining: Duration::days(1),
        },
        ListingSeed {
            id: "LST-004",
            name: "Oval Brilliant 2.0ct",
            shape: "Oval",
            carat: 2.0,
            color: "D",
            clarity: "IF",
            cut: "Excellent",
            certification: Some("GIA-5520918834"),
            asking_price: 32100,
            seller: "Pure Radiance",
            status: AuctionStatus::Active,
            age: Duration::days(4),
            remaining: Duration::days(5),
        },
        ListingSeed {
            id: "LST-005",
            name: "Cushion Cut 1.5ct",
            shape: "Cushion",
            carat: 1.5,
            color: "E",
            clarity: "VS2",
            cut: "Very Good",
            certification: None,
            asking_price: 12800,
            seller: "Stellar Gems",
            status: AuctionStatus::Active,
            age: Duration::days(3),
            remaining: Duration::days(6),
        },
        ListingSeed {
            id: "LST-006",
            name: "Pear Shape 2.2ct",
            shape: "Pear",
            carat: 2.2,
            color: "F",
            clarity: "VVS1",
            cut: "Excellent",
            certification: Some("AGS-0092817364"),
            asking_price: 28900,
            seller: "Diamond Elite Co.",
            status: AuctionStatus::Active,
            age: Duration::days(2),
            remaining: Duration::days(12),
        },
        ListingSeed {
            id: "LST-007",
            name: "Marquise 1.9ct",
            shape: "Marquise",
            carat: 1.9,
            color: "D",
            clarity: "VS1",
            cut: "Excellent",
            certification: Some("HRD-7781203945"),
            asking_price: 21500,
            seller: "Gem Masters",
            status: AuctionStatus::Active,
            age: Duration::days(1),
            remaining: Duration::days(13),
        },
        ListingSeed {
            id: "LST-008",
            name: "Heart Shape 2.8ct",
            shape: "Heart",
            carat: 2.8,
            color: "E",
            clarity: "VVS2",
            cut: "Very Good",
            certification: Some("GIA-3349017762"),
            asking_price: 38400,
            seller: "Crown Diamonds",
            status: AuctionStatus::Closed,
            age: Duration::days(30),
            remaining: -Duration::days(2),
        },
    ]
}

fn bid_seeds() -> Vec<BidSeed> {
    vec![
        BidSeed {
            id: "BID-101",
            listing_id: "LST-001",
            bidder: ("USR-201", "John Smith", true, 4.8),
            amount: 23800,
            status: BidStatus::Pending,
            age: Duration::hours(6),
            note: Some("Willing to complete immediately"),
        },
        BidSeed {
            id: "BID-102",
            listing_id: "LST-001",
            bidder: ("USR-202", "Maria Garcia", true, 4.9),
            amount: 23200,
            status: BidStatus::Pending,
            age: Duration::hours(28),
            note: None,
        },
        BidSeed {
            id: "BID-103",
            listing_id: "LST-001",
            bidder: ("USR-203", "David Chen", true, 4.7),
            amount: 22500,
            status: BidStatus::Pending,
            age: Duration::hours(54),
            note: Some("First-time buyer, very interested"),
        },
        BidSeed {
            id: "BID-001",
            listing_id: "LST-001",
            bidder: DEMO,
            amount: 23500,
            status: BidStatus::Pending,
            age: Duration::hours(8),
            note: Some("Interested in quick closing"),
        },
        BidSeed {
            id: "BID-002",
            listing_id: "LST-002",
            bidder: DEMO,
            amount: 17800,
            status: BidStatus::Pending,
            age: Duration::hours(30),
            note: None,
        },
        BidSeed {
            id: "BID-003",
            listing_id: "LST-003",
            bidder: DEMO,
            amount: 41000,
            status: BidStatus::Accepted,
            age: Duration::hours(50),
            note: Some("Best price offer"),
        },
        BidSeed {
            id: "BID-104",
            listing_id: "LST-003",
            bidder: ("USR-204", "Priya Shah", false, 4.2),
            amount: 40200,
            status: BidStatus::AutoRejected,
            age: Duration::hours(70),
            note: None,
        },
        BidSeed {
            id: "BID-004",
            listing_id: "LST-004",
            bidder: DEMO,
            amount: 29500,
            status: BidStatus::Rejected,
            age: Duration::hours(75),
            note: None,
        },
        BidSeed {
            id: "BID-105",
            listing_id: "LST-004",
            bidder: ("USR-201", "John Smith", true, 4.8),
            amount: 30500,
            status: BidStatus::Pending,
            age: Duration::hours(20),
            note: None,
        },
        BidSeed {
            id: "BID-005",
            listing_id: "LST-005",
            bidder: DEMO,
            amount: 12000,
            status: BidStatus::Cancelled,
            age: Duration::hours(98),
            note: Some("Changed my mind"),
        },
        BidSeed {
            id: "BID-106",
            listing_id: "LST-008",
            bidder: ("USR-205", "Omar Haddad", true, 4.5),
            amount: 35000,
            status: BidStatus::Pending,
            age: Duration::days(4),
            note: None,
        },
    ]
}

/// 상품과 입찰 시드
pub fn listings(now: DateTime<Utc>) -> Vec<(Listing, Vec<Bid>)> {
    let bids = bid_seeds();
    listing_seeds()
        .into_iter()
        .map(|seed| {
            let listing = Listing {
                id: seed.id.to_string(),
                name: seed.name.to_string(),
                specs: format!("{}/{}/{}", seed.color, seed.clarity, cut_code(seed.cut)),
                diamond: DiamondSpecs {
                    shape: seed.shape.to_string(),
                    carat: seed.carat,
                    color: seed.color.to_string(),
                    clarity: seed.clarity.to_string(),
                    cut: seed.cut.to_string(),
                    certification: seed.certification.map(str::to_string),
                },
                asking_price: seed.asking_price,
                seller: seed.seller.to_string(),
                auction_status: seed.status,
                created_at: now - seed.age,
                ends_at: now + seed.remaining,
            };
            let listing_bids = bids
                .iter()
                .filter(|b| b.listing_id == seed.id)
                .map(|b| Bid {
                    id: b.id.to_string(),
                    listing_id: b.listing_id.to_string(),
                    bid_amount: b.amount,
                    status: b.status,
                    placed_at: now - b.age,
                    note: b.note.map(str::to_string),
                    bidder: Bidder {
                        id: b.bidder.0.to_string(),
                        name: b.bidder.1.to_string(),
                        verified: b.bidder.2,
                        rating: b.bidder.3,
                    },
                })
                .collect();
            (listing, listing_bids)
        })
        .collect()
}

/// 저장된 선호 조건 시드
pub fn preferences() -> Vec<PreferenceDraft> {
    vec![
        PreferenceDraft {
            shape: "Round".into(),
            carat_min: 1.0,
            carat_max: 2.5,
            color: "D".into(),
            clarity: "VVS1".into(),
            budget: 25000.0,
            location: "Belgium".into(),
            cut: Some("Excellent".into()),
            certification: Some("GIA".into()),
            priority: Some("high".into()),
            ..PreferenceDraft::default()
        },
        PreferenceDraft {
            shape: "Oval".into(),
            carat_min: 0.5,
            carat_max: 1.5,
            color: "G".into(),
            clarity: "VS1".into(),
            lab: true,
            lab_name: Some("CVD".into()),
            budget: 6000.0,
            location: "India".into(),
            notes: Some("Lab-grown is fine for this one".into()),
            ..PreferenceDraft::default()
        },
    ]
}

fn cut_code(cut: &str) -> &'static str {
    match cut {
        "Ideal" => "ID",
        "Excellent" => "EX",
        "Very Good" => "VG",
        "Good" => "G",
        _ => "F",
    }
}
