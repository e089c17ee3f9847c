use diesel::prelude::*;
use crate::db::bible_schema::*;

#[derive(Debug, Clone, Queryable, Selectable, PartialEq)]
#[diesel(table_name = metadata)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MetadataRow {
    pub key: String,
    pub value: String,
}

#[derive(Insertable)]
#[diesel(table_name = metadata)]
pub struct NewMetadataRow<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, PartialEq)]
#[diesel(table_name = book_index)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BookIndexRow {
    pub book_id: i64,
    pub name: String,
}

#[derive(Insertable)]
#[diesel(table_name = book_index)]
pub struct NewBookIndexRow<'a> {
    pub book_id: i64,
    pub name: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, PartialEq)]
#[diesel(table_name = content)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ContentRow {
    pub book_id: i64,
    pub chapter_id: i64,
    pub verse_id: i64,
    pub verse_text: String,
}

#[derive(Insertable)]
#[diesel(table_name = content)]
pub struct NewContentRow<'a> {
    pub book_id: i64,
    pub chapter_id: i64,
    pub verse_id: i64,
    pub verse_text: &'a str,
}
