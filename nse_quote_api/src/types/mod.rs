mod quote;
pub use self::quote::{HighLow, Info, Metadata, PriceInfo, QuoteEquity};
