/// Default input/output locations and lookup tables for the order workbook.
/// These only seed `ConvertConfig::default()`; nothing reads them directly.

pub const DEFAULT_WORKBOOK: &str = "List Excel Dropee_Amin Edit.xlsx";
pub const DEFAULT_OUTPUT_DIR: &str = "public/data";

pub const ORDERS_FILE: &str = "orders.json";
pub const METADATA_FILE: &str = "metadata.json";

/// Sheets that hold order data, in merge order
pub const DATA_SHEETS: &[&str] = &[
    "1-2000",
    "2001-4000",
    "4001-6000",
    "6001-8000",
    "8001-9000",
    "9001-10000",
    "10001-11000",
];

pub const ORDER_NO_VARIANTS: &[&str] = &["Order No", "Order No.", "OrderNo", "Supplier Order No"];
pub const ORDER_DATE_VARIANTS: &[&str] = &["Order Date", "OrderDate"];
pub const ORDER_TOTAL_VARIANTS: &[&str] = &["Order Total (RM)", "Order Total", "OrderTotal"];
pub const CUSTOMER_NAME_VARIANTS: &[&str] = &["Order By", "OrderBy", "Customer"];
pub const EMAIL_VARIANTS: &[&str] = &["Email", "E-mail"];
pub const MOBILE_NO_VARIANTS: &[&str] = &["Mobile No", "Mobile No.", "Phone", "MobileNo"];
pub const SHIP_TO_VARIANTS: &[&str] = &["Ship To", "ShipTo", "Address"];
pub const STATE_VARIANTS: &[&str] = &["State"];
pub const ITEM_NAME_VARIANTS: &[&str] = &["Item Name", "ItemName", "Product"];
pub const ITEM_BRAND_VARIANTS: &[&str] = &["Item Brand", "ItemBrand", "Brand"];

/// Uppercased state spellings collapsed onto their canonical name
pub const STATE_ALIASES: &[(&str, &str)] = &[
    ("WILAYAH PERSEKUTUAN", "KUALA LUMPUR"),
    ("W.P. KUALA LUMPUR", "KUALA LUMPUR"),
    ("PULAU PINANG", "PENANG"),
];

/// Stringified missing values left behind by upstream exports
pub const TEXT_NULL_TOKENS: &[&str] = &["nan", "None", "NaN", ""];
pub const STATE_NULL_TOKENS: &[&str] = &["NAN", "NONE", "NAT", ""];
pub const STATE_NULL_SUBSTRINGS: &[&str] = &["NAN", "NONE", "NAT"];
pub const BRAND_EXCLUDED: &[&str] = &["nan", "None", "", "-"];

pub const CURRENCY_MARKERS: &[&str] = &["RM"];

pub const BRAND_LIMIT: usize = 500;
