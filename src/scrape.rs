//! Readers for the WS-TCG rules, card-detail and product pages.
use async_trait::async_trait;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use reqwest::{Client, Url};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::error::{ImportError, Result};
use crate::model::{NeoStandard, SetEnrichment};

pub const WEISS_HEADING: &str = "Weiß Side";
pub const SCHWARZ_HEADING: &str = "Schwarz Side";

const NEO_PAGE: &str = "neo-standard page";
const DETAIL_PAGE: &str = "card details page";
const PRODUCT_PAGE: &str = "product page";

static H4: Lazy<Selector> = Lazy::new(|| Selector::parse("h4").expect("valid selector"));
static TR: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("valid selector"));
static TD: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("valid selector"));
static RELEASE_DATE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".p-cards__cardset-item .date").expect("valid selector"));
static PRODUCT_LINK: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".p-cards__cardset-link a[href*='/products']").expect("valid selector")
});
static PRODUCT_CATEGORY: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".p-products__category").expect("valid selector"));

#[async_trait]
pub trait CardSite: Send + Sync {
    /// Both title tables of the deck construction rules, Weiß first.
    async fn fetch_neo_standards(&self) -> Result<Vec<NeoStandard>>;

    /// Release date and product type of the set a sample card belongs to.
    async fn lookup_set_details(&self, card_code: &str) -> Result<SetEnrichment>;
}

#[derive(Debug, Clone)]
pub struct WsTcgSite {
    http: Client,
    neo_standard_url: String,
    card_details_url: String,
}

impl WsTcgSite {
    pub fn new(http: Client, neo_standard_url: &str, card_details_url: &str) -> Self {
        Self {
            http,
            neo_standard_url: neo_standard_url.to_string(),
            card_details_url: card_details_url.to_string(),
        }
    }

    async fn fetch_page(&self, page: &str, request: reqwest::RequestBuilder) -> Result<(Url, String)> {
        let response = request
            .send()
            .await
            .map_err(|e| ImportError::transport(page, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ImportError::Status {
                op: page.to_string(),
                status: status.as_u16(),
                message: format!("request to the WS-TCG {page} failed"),
            });
        }
        let url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| ImportError::transport(page, e))?;
        Ok((url, body))
    }
}

#[async_trait]
impl CardSite for WsTcgSite {
    async fn fetch_neo_standards(&self) -> Result<Vec<NeoStandard>> {
        let (_, html) = self
            .fetch_page(NEO_PAGE, self.http.get(&self.neo_standard_url))
            .await?;
        parse_neo_standards(&html)
    }

    async fn lookup_set_details(&self, card_code: &str) -> Result<SetEnrichment> {
        let request = self
            .http
            .get(&self.card_details_url)
            .query(&[("cardno", card_code)]);
        let (page_url, html) = self.fetch_page(DETAIL_PAGE, request).await?;
        let detail = parse_card_detail(&html);

        let release_date = detail.release_date.as_deref().and_then(|raw| {
            let parsed = parse_release_date(raw);
            if parsed.is_none() {
                warn!(card_code, raw, "unrecognised release date");
            }
            parsed
        });

        let product_type = match detail.product_href {
            Some(href) => {
                let product_url = page_url.join(&href).map_err(|e| {
                    ImportError::scrape(DETAIL_PAGE, format!("bad product link \"{href}\": {e}"))
                })?;
                debug!(%product_url, "following product page link");
                let (_, html) = self
                    .fetch_page(PRODUCT_PAGE, self.http.get(product_url))
                    .await?;
                parse_product_category(&html)
            }
            None => None,
        };

        Ok(SetEnrichment {
            release_date,
            product_type,
        })
    }
}

fn element_text(el: &ElementRef<'_>) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract both title tables from the deck construction rules page.
///
/// A missing heading, table or row shape is an error: submitting an empty
/// list would wipe the groupings in the catalog.
pub fn parse_neo_standards(html: &str) -> Result<Vec<NeoStandard>> {
    let doc = Html::parse_document(html);
    let mut standards = table_after_heading(&doc, WEISS_HEADING)?;
    standards.extend(table_after_heading(&doc, SCHWARZ_HEADING)?);
    Ok(standards)
}

fn table_after_heading(doc: &Html, heading: &str) -> Result<Vec<NeoStandard>> {
    let h4 = doc
        .select(&H4)
        .find(|h| element_text(h).contains(heading))
        .ok_or_else(|| ImportError::scrape(NEO_PAGE, format!("heading \"{heading}\" not found")))?;
    let container = h4
        .next_siblings()
        .find_map(ElementRef::wrap)
        .ok_or_else(|| ImportError::scrape(NEO_PAGE, format!("no table after \"{heading}\"")))?;

    // First row is the column header.
    let rows: Vec<ElementRef<'_>> = container.select(&TR).skip(1).collect();
    if rows.is_empty() {
        return Err(ImportError::scrape(
            NEO_PAGE,
            format!("table after \"{heading}\" has no rows"),
        ));
    }

    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            let cells: Vec<ElementRef<'_>> = row.select(&TD).collect();
            let (Some(first), Some(last)) = (cells.first(), cells.last()) else {
                return Err(ImportError::scrape(
                    NEO_PAGE,
                    format!("row {} under \"{heading}\" has no cells", idx + 1),
                ));
            };
            let title = element_text(first);
            if title.is_empty() {
                return Err(ImportError::scrape(
                    NEO_PAGE,
                    format!("row {} under \"{heading}\" has no title", idx + 1),
                ));
            }
            let codes = element_text(last)
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect();
            Ok(NeoStandard { title, codes })
        })
        .collect()
}

/// What the card detail page tells us about the card's set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardDetail {
    pub release_date: Option<String>,
    pub product_href: Option<String>,
}

pub fn parse_card_detail(html: &str) -> CardDetail {
    let doc = Html::parse_document(html);
    let release_date = doc
        .select(&RELEASE_DATE)
        .next()
        .map(|el| element_text(&el))
        .filter(|s| !s.is_empty());
    let product_href = doc
        .select(&PRODUCT_LINK)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string);
    CardDetail {
        release_date,
        product_href,
    }
}

pub fn parse_product_category(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    doc.select(&PRODUCT_CATEGORY)
        .next()
        .map(|el| element_text(&el))
        .filter(|s| !s.is_empty())
}

/// Parse dates like `Aug. 2, 2024` or `May 10, 2024`.
pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = raw.replace('.', "");
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    let cleaned = cleaned.replacen("Sept ", "Sep ", 1);
    ["%b %d, %Y", "%B %d, %Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&cleaned, fmt).ok())
}
