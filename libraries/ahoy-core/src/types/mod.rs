mod catalog;
mod ids;
mod record;

pub use catalog::{parse_records, resolve_media_url, Artist, Catalog, CatalogItem, PodcastShow};
pub use ids::NodeId;
pub use record::{field_str, FieldChain, Record, ARTIST_IMAGE, ARTIST_KEY, ARTWORK, AUDIO_URL};
