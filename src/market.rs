//! Sample data shown by the desk. Nothing here is fetched from the chain.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeStatus {
    Completed,
    Pending,
}

impl std::fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed => write!(f, "Completed"),
            Self::Pending => write!(f, "Pending"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecentTrade {
    pub pair: &'static str,
    pub amount: &'static str,
    pub price: &'static str,
    pub status: TradeStatus,
    pub pnl: Option<&'static str>,
}

pub const RECENT_TRADES: [RecentTrade; 3] = [
    RecentTrade {
        pair: "ETH/USDT",
        amount: "500,000",
        price: "2,450.30",
        status: TradeStatus::Completed,
        pnl: Some("+2.1%"),
    },
    RecentTrade {
        pair: "BTC/USDT",
        amount: "250,000",
        price: "42,150.80",
        status: TradeStatus::Completed,
        pnl: Some("+0.8%"),
    },
    RecentTrade {
        pair: "ETH/USDC",
        amount: "750,000",
        price: "2,448.90",
        status: TradeStatus::Pending,
        pnl: None,
    },
];
