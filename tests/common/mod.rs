#![allow(dead_code)]

use qail_typed::prelude::*;

entity! {
    /// Someone with an account.
    pub struct Person in "person" {
        ID => "id": i64,
        NAME => "name": String,
        AGE => "age": Option<i32>,
        FAVORITE_NUMBER => "favorite_number": i64,
    }
}

entity! {
    pub struct BlogPost in "blog_post" {
        ID => "id": i64,
        TITLE => "title": String,
        AUTHOR_ID => "author_id": i64,
    }
}

entity! {
    pub struct Follow in "follow" {
        FOLLOWER => "follower": i64,
        FOLLOWED => "followed": i64,
    }
}

entity! {
    pub struct Tag in "tag" {
        ID => "id": i64,
        POST_ID => "post_id": i64,
        LABEL => "label": String,
    }
}

entity! {
    /// Legacy table whose name looks like a generated alias.
    pub struct LegacyPerson in "person2" {
        ID => "id": i64,
    }
}

/// The ON predicate bound to the join at registration index `index`.
pub fn on_at(ast: &QueryAst, index: usize) -> Option<String> {
    match ast.from.get(RegistrationId(index)) {
        Some(Registration::Join(join)) => join.on.as_ref().map(|on| on.to_string()),
        _ => None,
    }
}

pub fn root_tables(ast: &QueryAst) -> Vec<String> {
    ast.from
        .roots
        .iter()
        .map(|root| match ast.from.get(*root) {
            Some(Registration::Scope(scope)) => scope.alias.clone(),
            Some(Registration::Join(join)) => format!("{}", join.kind),
            None => String::from("?"),
        })
        .collect()
}
