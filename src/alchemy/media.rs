use super::types::NftMetadata;

pub static IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";

/// Rewrites `ipfs://` links onto the public gateway and passes web and
/// `data:` URLs through. Anything else is not displayable.
pub fn normalize_media_url(src: &str) -> Option<String> {
    if let Some(path) = src.strip_prefix("ipfs://") {
        let cid = path.strip_prefix("ipfs/").unwrap_or(path);
        return Some(format!("{}{}", IPFS_GATEWAY, cid));
    }
    if src.starts_with("http") || src.starts_with("data:") {
        return Some(src.to_string());
    }
    None
}

fn first_media<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .find_map(normalize_media_url)
}

pub fn image_url(nft: &NftMetadata) -> Option<String> {
    let image = nft.image.as_ref();
    let raw_image = nft
        .raw
        .as_ref()
        .and_then(|r| r.metadata.as_ref())
        .and_then(|m| m.image.as_deref());
    let media = nft.media.as_ref().and_then(|m| m.first());

    first_media([
        image.and_then(|i| i.cached_url.as_deref()),
        image.and_then(|i| i.original_url.as_deref()),
        image.and_then(|i| i.thumbnail_url.as_deref()),
        image.and_then(|i| i.png_url.as_deref()),
        raw_image,
        media.and_then(|m| m.gateway.as_deref()),
        media.and_then(|m| m.raw.as_deref()),
    ])
}

pub fn thumbnail_url(nft: &NftMetadata) -> Option<String> {
    let image = nft.image.as_ref();

    first_media([
        image.and_then(|i| i.thumbnail_url.as_deref()),
        image.and_then(|i| i.png_url.as_deref()),
        image.and_then(|i| i.cached_url.as_deref()),
    ])
    .or_else(|| image_url(nft))
}
