//! Streaming reader that splits the product feed into [`FeedNode`]s.
//!
//! Expected shape (attribute names are fixed by the feed publisher):
//!
//! ```xml
//! <Products>
//!   <Product ProductId="123-X" Name="linen shirt">
//!     <Images><Image Path="https://cdn/1.jpg"/></Images>
//!     <ProductDetails>
//!       <ProductDetail Name="Price" Value="10,50"/>
//!     </ProductDetails>
//!     <Description><![CDATA[<ul><li>...</li></ul>]]></Description>
//!   </Product>
//! </Products>
//! ```

use std::borrow::Cow;

use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;

use crate::error::FeedError;
use crate::node::FeedNode;

const PRODUCT: &str = "Product";
const IMAGES: &str = "Images";
const IMAGE: &str = "Image";
const DETAILS: &str = "ProductDetails";
const DETAIL: &str = "ProductDetail";
const DESCRIPTION: &str = "Description";

/// Parses every `<Product>` element in `xml`, in document order.
///
/// Elements outside a product, and unknown children inside one, are skipped.
///
/// # Errors
///
/// Returns [`FeedError::Xml`] if the document is not well-formed XML.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedNode>, FeedError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut nodes = Vec::new();
    let mut current: Option<FeedNode> = None;
    // Element names below the current <Product>, outermost first.
    let mut path: Vec<String> = Vec::new();
    let mut description = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = element_name(e.name().as_ref());
                if let Some(node) = current.as_mut() {
                    read_child(node, &path, &name, &e)?;
                    path.push(name);
                } else if name == PRODUCT {
                    current = Some(node_from_product(&e)?);
                    path.clear();
                    description.clear();
                }
            }
            Ok(Event::Empty(e)) => {
                let name = element_name(e.name().as_ref());
                if let Some(node) = current.as_mut() {
                    read_child(node, &path, &name, &e)?;
                } else if name == PRODUCT {
                    nodes.push(node_from_product(&e)?);
                }
            }
            Ok(Event::End(_)) => {
                if current.is_none() {
                    continue;
                }
                if path.is_empty() {
                    if let Some(mut node) = current.take() {
                        if !description.is_empty() {
                            node.description = Some(std::mem::take(&mut description));
                        }
                        nodes.push(node);
                    }
                } else {
                    path.pop();
                }
            }
            Ok(Event::Text(e)) => {
                if in_description(&path) {
                    description.push_str(&text_content(&e));
                }
            }
            Ok(Event::CData(e)) => {
                if in_description(&path) {
                    description.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(FeedError::Xml(e)),
            _ => {}
        }
    }

    Ok(nodes)
}

fn element_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

fn in_description(path: &[String]) -> bool {
    path.first().is_some_and(|first| first == DESCRIPTION)
}

fn node_from_product(e: &BytesStart<'_>) -> Result<FeedNode, FeedError> {
    Ok(FeedNode {
        product_id: attribute(e, "ProductId")?,
        name: attribute(e, "Name")?,
        ..FeedNode::default()
    })
}

/// Records `Images/Image` and `ProductDetails/ProductDetail` children.
fn read_child(
    node: &mut FeedNode,
    path: &[String],
    name: &str,
    e: &BytesStart<'_>,
) -> Result<(), FeedError> {
    let parent = match path {
        [parent] => parent.as_str(),
        _ => return Ok(()),
    };
    match (parent, name) {
        (IMAGES, IMAGE) => {
            if let Some(path) = attribute(e, "Path")? {
                node.images.push(path);
            }
        }
        (DETAILS, DETAIL) => {
            if let Some(detail_name) = attribute(e, "Name")? {
                let value = attribute(e, "Value")?.unwrap_or_default();
                node.details.push((detail_name, value));
            }
        }
        _ => {}
    }
    Ok(())
}

fn attribute(e: &BytesStart<'_>, key: &str) -> Result<Option<String>, FeedError> {
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref() == key.as_bytes() {
            let value = attr.unescape_value()?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Unescaped text, falling back to the raw bytes when the text carries HTML
/// entities XML does not define (e.g. `&nbsp;`).
fn text_content(e: &BytesText<'_>) -> String {
    e.unescape().map_or_else(
        |_| String::from_utf8_lossy(e).into_owned(),
        Cow::into_owned,
    )
}
