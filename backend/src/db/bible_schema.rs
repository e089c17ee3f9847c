// Column layout of the SQLite export. The tables are created from the
// `CREATE_*_TABLE` statements in `db`, not by migrations, so the file holds no
// other tables.

diesel::table! {
    metadata (key) {
        key -> Text,
        value -> Text,
    }
}

diesel::table! {
    book_index (book_id) {
        book_id -> BigInt,
        name -> Text,
    }
}

// The SQL table has no primary key, diesel needs one declared.
diesel::table! {
    content (book_id, chapter_id, verse_id) {
        book_id -> BigInt,
        chapter_id -> BigInt,
        verse_id -> BigInt,
        #[sql_name = "content"]
        verse_text -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    metadata,
    book_index,
    content,
);
