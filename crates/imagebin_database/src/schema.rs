//! Diesel schema definitions.

diesel::table! {
    images (id) {
        id -> Uuid,
        owner_id -> Text,
        public_filename -> Text,
        stored_name -> Text,
        mime_type -> Text,
        size_bytes -> Int8,
        uploaded_at -> Timestamptz,
    }
}
