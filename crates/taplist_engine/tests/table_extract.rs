use pretty_assertions::assert_eq;
use taplist_core::{extract_records, BeerKey, ExtractionError};
use taplist_engine::{decode_page, load_document, parse_table_document, FetchSettings, ReqwestFetcher};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = r#"<html><body>
<table>
  <tr><th>Brewery</th><th>Beer</th><th>Style</th><th>ABV</th><th>Location</th><th>Bar</th></tr>
  <tr><td>Brewer A</td><td>Golden</td><td>Golden Ale, 4.2%</td><td>4.2%</td><td>Tent 1</td><td>Bar X</td></tr>
  <tr><td colspan="6">Sponsored by the local council</td></tr>
  <tr><td>Brewer B</td><td>Night
      Shade</td><td>Stout</td><td>TBC</td><td>Tent 2</td><td>Bar Y</td></tr>
</table>
</body></html>"#;

#[test]
fn html_table_yields_records_in_page_order() {
    let records = extract_records(&parse_table_document(PAGE)).unwrap();

    let summary: Vec<_> = records
        .iter()
        .map(|r| (r.brewery.as_str(), r.name.as_str(), r.abv, r.bar.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Brewer A", "Golden", 4.2, "Bar X"),
            ("Brewer B", "Night Shade", 0.0, "Bar Y"),
        ]
    );
}

#[test]
fn inline_markup_keeps_key_and_abv_intact() {
    let html = "<table><tr><td>Brew<b>Dog</b></td><td>Hazy <em>Jane</em></td><td>NEIPA</td>\
                <td><span>5</span>.4%</td><td>Hall</td><td>Bar 1</td></tr></table>";
    let records = extract_records(&parse_table_document(html)).unwrap();

    assert_eq!(records[0].key(), BeerKey::new("BrewDog", "Hazy Jane"));
    assert_eq!(records[0].abv, 5.4);
}

#[test]
fn page_without_tables_has_no_records() {
    let doc = parse_table_document("<html><body><p>Beer list coming soon</p></body></html>");
    assert!(doc.is_empty());
    assert_eq!(
        extract_records(&doc).unwrap_err(),
        ExtractionError::NoRecords { rows_scanned: 0 }
    );
}

#[test]
fn latin1_page_is_decoded_before_parsing() {
    let mut bytes = b"<table><tr><td>Br\xe4u</td><td>M\xe4rzen</td><td>Lager</td><td>5%</td><td>Hall</td><td>Bar 1</td></tr></table>".to_vec();
    bytes.splice(0..0, b"<meta charset=\"iso-8859-1\">".iter().copied());

    let page = decode_page(&bytes, Some("text/html")).unwrap();
    let records = extract_records(&parse_table_document(&page.html)).unwrap();
    assert_eq!(records[0].brewery, "Br\u{e4}u");
    assert_eq!(records[0].name, "M\u{e4}rzen");
}

#[tokio::test]
async fn load_document_fetches_decodes_and_tabulates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/list"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PAGE, "text/html; charset=utf-8"))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let doc = load_document(&fetcher, &format!("{}/list", server.uri()))
        .await
        .expect("document");
    assert_eq!(doc.rows.len(), 4);
    assert_eq!(extract_records(&doc).unwrap().len(), 2);
}
