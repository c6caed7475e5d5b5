/// Whether a browser-reported MIME type can be staged for detection.
pub fn is_image_mime(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// Position of the first stageable file in a picked, dropped or pasted list.
pub fn first_image_index<'a>(mime_types: impl IntoIterator<Item = &'a str>) -> Option<usize> {
    mime_types.into_iter().position(is_image_mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_image_after_leading_non_images() {
        assert_eq!(first_image_index(["text/plain", "application/pdf", "image/png"]), Some(2));
    }

    #[test]
    fn first_of_several_images_wins() {
        assert_eq!(first_image_index(["image/jpeg", "image/png"]), Some(0));
    }

    #[test]
    fn no_image_in_list() {
        assert_eq!(first_image_index(["text/plain"]), None);
        assert_eq!(first_image_index(Vec::<&str>::new()), None);
    }
}
