mod common;

use common::{BlogPost, Follow, LegacyPerson, Person, Tag};
use pretty_assertions::assert_eq;
use qail_typed::prelude::*;

fn authors_with_posts() -> QailResult<Statement<(Expr<String>, Expr<String>)>> {
    select(|q| {
        let (p, b) = q.from(inner_join(table::<Person>(), table::<BlogPost>()));
        q.on(p.proj(Person::ID).eq(b.proj(BlogPost::AUTHOR_ID)))?;
        q.where_(p.proj(Person::FAVORITE_NUMBER).gt(val(7i64)));
        q.where_(b.proj(BlogPost::TITLE).like(val("Rust%")));
        q.order_by([asc(p.proj(Person::NAME)), desc(b.proj(BlogPost::ID))]);
        q.limit(10);
        q.offset(20);
        Ok((p.proj(Person::NAME), b.proj(BlogPost::TITLE)))
    })
}

#[test]
fn test_select_with_join_postgres() {
    let out = authors_with_posts()
        .unwrap()
        .render(&SqlRenderer::postgres())
        .unwrap();
    assert_eq!(
        out.sql,
        "SELECT person.name, blog_post.title FROM person \
         INNER JOIN blog_post ON (person.id = blog_post.author_id) \
         WHERE (person.favorite_number > $1) AND (blog_post.title LIKE $2) \
         ORDER BY person.name ASC, blog_post.id DESC LIMIT 10 OFFSET 20"
    );
    assert_eq!(out.params, vec![Value::Int(7), Value::String("Rust%".to_string())]);
}

#[test]
fn test_select_with_join_sqlite() {
    let out = authors_with_posts()
        .unwrap()
        .render(&SqlRenderer::sqlite())
        .unwrap();
    assert_eq!(
        out.sql,
        "SELECT \"person\".\"name\", \"blog_post\".\"title\" FROM \"person\" \
         INNER JOIN \"blog_post\" ON (\"person\".\"id\" = \"blog_post\".\"author_id\") \
         WHERE (\"person\".\"favorite_number\" > ?) AND (\"blog_post\".\"title\" LIKE ?) \
         ORDER BY \"person\".\"name\" ASC, \"blog_post\".\"id\" DESC LIMIT 10 OFFSET 20"
    );
    assert_eq!(out.params.len(), 2);
}

#[test]
fn test_on_params_come_before_where_params() {
    let stmt = select(|q| {
        let (p, b) = q.from(left_outer_join(table::<Person>(), nullable::<BlogPost>()));
        q.on(just(p.proj(Person::ID))
            .eq(b.proj_maybe(BlogPost::AUTHOR_ID))
            .and(b.proj_maybe(BlogPost::TITLE).ne(val(Some("draft")))))?;
        q.where_(p.proj(Person::NAME).eq(val("Ada")));
        Ok(b.proj_maybe(BlogPost::TITLE))
    })
    .unwrap();
    let out = stmt.render(&SqlRenderer::postgres()).unwrap();
    assert_eq!(
        out.sql,
        "SELECT blog_post.title FROM person LEFT OUTER JOIN blog_post \
         ON ((person.id = blog_post.author_id) AND (blog_post.title != $1)) \
         WHERE (person.name = $2)"
    );
    assert_eq!(
        out.params,
        vec![Value::String("draft".into()), Value::String("Ada".into())]
    );
}

#[test]
fn test_bare_join_renders_without_on() {
    let stmt = select(|q| {
        let (p, f) = q.from(inner_join(table::<Person>(), table::<Follow>()));
        Ok((p.proj(Person::ID), f.proj(Follow::FOLLOWED)))
    })
    .unwrap();
    let out = stmt.render(&SqlRenderer::postgres()).unwrap();
    assert_eq!(
        out.sql,
        "SELECT person.id, follow.followed FROM person INNER JOIN follow"
    );
}

#[test]
fn test_tuple_roots_are_comma_separated() {
    let stmt = select(|q| {
        let (p, f) = q.from((table::<Person>(), table::<Follow>()));
        q.where_(p.proj(Person::ID).eq(f.proj(Follow::FOLLOWER)));
        Ok(f.proj(Follow::FOLLOWED))
    })
    .unwrap();
    let out = stmt.render(&SqlRenderer::postgres()).unwrap();
    assert_eq!(
        out.sql,
        "SELECT follow.followed FROM person, follow WHERE (person.id = follow.follower)"
    );
}

#[test]
fn test_update_renders_every_operator() {
    let stmt = update(|q| {
        let p = q.from(table::<Person>());
        q.set(
            &p,
            [
                Person::NAME.assign(val("Grace")),
                Person::FAVORITE_NUMBER.add_assign(val(1i64)),
                Person::FAVORITE_NUMBER.sub_assign(val(2i64)),
                Person::FAVORITE_NUMBER.mul_assign(val(3i64)),
                Person::FAVORITE_NUMBER.div_assign(val(4i64)),
            ],
        );
        q.where_(p.proj(Person::ID).eq(val(9i64)));
        Ok(())
    })
    .unwrap();
    let out = stmt.render(&SqlRenderer::postgres()).unwrap();
    assert_eq!(
        out.sql,
        "UPDATE person SET name = $1, \
         favorite_number = (person.favorite_number + $2), \
         favorite_number = (person.favorite_number - $3), \
         favorite_number = (person.favorite_number * $4), \
         favorite_number = (person.favorite_number / $5) \
         WHERE (person.id = $6)"
    );
    assert_eq!(
        out.params,
        vec![
            Value::String("Grace".into()),
            Value::Int(1),
            Value::Int(2),
            Value::Int(3),
            Value::Int(4),
            Value::Int(9),
        ]
    );
}

#[test]
fn test_update_to_null() {
    let stmt = update(|q| {
        let p = q.from(table::<Person>());
        q.set(&p, [Person::AGE.assign(nothing())]);
        Ok(())
    })
    .unwrap();
    let out = stmt.render(&SqlRenderer::sqlite()).unwrap();
    assert_eq!(out.sql, "UPDATE \"person\" SET \"age\" = NULL");
    assert!(out.params.is_empty());
}

#[test]
fn test_set_inside_select_is_rejected_by_renderer() {
    let stmt = select(|q| {
        let p = q.from(table::<Person>());
        q.set(&p, [Person::NAME.assign(val("nobody"))]);
        Ok(p.proj(Person::ID))
    })
    .unwrap();
    let err = stmt.render(&SqlRenderer::postgres()).unwrap_err();
    assert!(matches!(
        err,
        QailError::SetOutsideUpdate {
            statement: StatementKind::Select
        }
    ));
}

#[test]
fn test_delete_with_where() {
    let stmt = delete(|q| {
        let f = q.from(table::<Follow>());
        q.where_(f.proj(Follow::FOLLOWER).in_(val_list([1i64, 2, 3])));
        Ok(())
    })
    .unwrap();
    let out = stmt.render(&SqlRenderer::postgres()).unwrap();
    assert_eq!(
        out.sql,
        "DELETE FROM follow WHERE (follow.follower IN ($1, $2, $3))"
    );
    assert_eq!(out.params, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
}

#[test]
fn test_sub_select_shares_placeholder_numbering() {
    let stmt = select(|q| {
        let p = q.from(table::<Person>());
        q.where_(p.proj(Person::NAME).ne(val("root")));
        let top = q.sub_select(|inner| {
            let b = inner.from(table::<BlogPost>());
            inner.where_(b.proj(BlogPost::TITLE).like(val("%rust%")));
            Ok(b.proj(BlogPost::AUTHOR_ID))
        })?;
        q.where_(p.proj(Person::ID).eq(top));
        q.where_(p.proj(Person::FAVORITE_NUMBER).lt(val(100i64)));
        Ok(p.proj(Person::NAME))
    })
    .unwrap();
    let out = stmt.render(&SqlRenderer::postgres()).unwrap();
    assert_eq!(
        out.sql,
        "SELECT person.name FROM person WHERE (person.name != $1) \
         AND (person.id = (SELECT blog_post.author_id FROM blog_post \
         WHERE (blog_post.title LIKE $2))) \
         AND (person.favorite_number < $3)"
    );
    assert_eq!(out.params.len(), 3);
}

#[test]
fn test_sub_select_distinct_shares_placeholder_numbering() {
    let stmt = select(|q| {
        let p = q.from(table::<Person>());
        q.where_(p.proj(Person::NAME).ne(val("root")));
        let authors = q.sub_select_distinct(|inner| {
            let b = inner.from(table::<BlogPost>());
            inner.where_(b.proj(BlogPost::TITLE).like(val("%rust%")));
            inner.limit(1);
            Ok(b.proj(BlogPost::AUTHOR_ID))
        })?;
        q.where_(p.proj(Person::ID).eq(authors));
        q.where_(p.proj(Person::FAVORITE_NUMBER).lt(val(100i64)));
        Ok(p.proj(Person::NAME))
    })
    .unwrap();
    let out = stmt.render(&SqlRenderer::postgres()).unwrap();
    assert_eq!(
        out.sql,
        "SELECT person.name FROM person WHERE (person.name != $1) \
         AND (person.id = (SELECT DISTINCT blog_post.author_id FROM blog_post \
         WHERE (blog_post.title LIKE $2) LIMIT 1)) \
         AND (person.favorite_number < $3)"
    );
    assert_eq!(
        out.params,
        vec![
            Value::String("root".into()),
            Value::String("%rust%".into()),
            Value::Int(100),
        ]
    );
}

#[test]
fn test_aliases_never_collide_with_table_names() {
    let stmt = select(|q| {
        let (a, b, c) = q.from((
            table::<Person>(),
            table::<Person>(),
            table::<LegacyPerson>(),
        ));
        Ok((a.proj(Person::ID), b.proj(Person::ID), c.proj(LegacyPerson::ID)))
    })
    .unwrap();
    let out = stmt.render(&SqlRenderer::postgres()).unwrap();
    assert_eq!(
        out.sql,
        "SELECT person.id, person2.id, person22.id \
         FROM person, person AS person2, person2 AS person22"
    );
}

#[test]
fn test_exists_and_not_exists() {
    let stmt = select(|q| {
        let p = q.from(table::<Person>());
        let has_posts = q.exists(|inner| {
            let b = inner.from(table::<BlogPost>());
            inner.where_(b.proj(BlogPost::AUTHOR_ID).eq(p.proj(Person::ID)));
            Ok(())
        })?;
        let unfollowed = q.not_exists(|inner| {
            let f = inner.from(table::<Follow>());
            inner.where_(f.proj(Follow::FOLLOWED).eq(p.proj(Person::ID)));
            inner.where_(f.proj(Follow::FOLLOWER).ne(val(0i64)));
            Ok(f.proj(Follow::FOLLOWER))
        })?;
        q.where_(has_posts.and(unfollowed));
        Ok(p.proj(Person::ID))
    })
    .unwrap();
    let out = stmt.render(&SqlRenderer::sqlite()).unwrap();
    assert_eq!(
        out.sql,
        "SELECT \"person\".\"id\" FROM \"person\" WHERE \
         ((EXISTS (SELECT 1 FROM \"blog_post\" \
         WHERE (\"blog_post\".\"author_id\" = \"person\".\"id\"))) AND \
         (NOT EXISTS (SELECT \"follow\".\"follower\" FROM \"follow\" \
         WHERE (\"follow\".\"followed\" = \"person\".\"id\") AND (\"follow\".\"follower\" != ?))))"
    );
    assert_eq!(out.params, vec![Value::Int(0)]);
}

#[test]
fn test_aggregates_group_by_having() {
    let stmt = select(|q| {
        let (p, b) = q.from(inner_join(table::<Person>(), table::<BlogPost>()));
        q.on(p.proj(Person::ID).eq(b.proj(BlogPost::AUTHOR_ID)))?;
        q.group_by(p.proj(Person::NAME));
        let posts: Expr<i64> = count(b.proj(BlogPost::ID));
        q.having(posts.clone().gt(val(2i64)));
        q.order_by([desc(count_rows::<i64>())]);
        Ok((p.proj(Person::NAME), posts, max(b.proj(BlogPost::ID))))
    })
    .unwrap();
    let out = stmt.render(&SqlRenderer::postgres()).unwrap();
    assert_eq!(
        out.sql,
        "SELECT person.name, COUNT(blog_post.id), MAX(blog_post.id) FROM person \
         INNER JOIN blog_post ON (person.id = blog_post.author_id) \
         GROUP BY person.name HAVING (COUNT(blog_post.id) > $1) ORDER BY COUNT(*) DESC"
    );
}

#[test]
fn test_distinct_with_coalesce_and_arithmetic() {
    let stmt = select(|q| {
        let p = q.from(table::<Person>());
        q.distinct();
        let age = coalesce_default(p.proj(Person::AGE), val(0i32));
        Ok(age * val(2i32))
    })
    .unwrap();
    let out = stmt.render(&SqlRenderer::postgres()).unwrap();
    assert_eq!(
        out.sql,
        "SELECT DISTINCT (COALESCE(person.age, $1) * $2) FROM person"
    );
}

#[test]
fn test_renderer_from_toml_config() {
    let config = RenderConfig::from_toml_str("[render]\ndialect = \"sqlite\"\n").unwrap();
    let renderer = SqlRenderer::new(config);
    let stmt = select(|q| {
        let t = q.from(table::<Tag>());
        Ok(t.proj(Tag::LABEL))
    })
    .unwrap();
    let out = stmt.render(&renderer).unwrap();
    assert_eq!(out.sql, "SELECT \"tag\".\"label\" FROM \"tag\"");
    assert_eq!(renderer.config().dialect, Dialect::Sqlite);
}

#[test]
fn test_statement_json_dump() {
    let stmt = authors_with_posts().unwrap();
    let json: serde_json::Value = serde_json::from_str(&stmt.to_json().unwrap()).unwrap();
    assert_eq!(json["statement"], "Select");
    assert_eq!(json["limit"], 10);
    assert_eq!(json["from"]["roots"].as_array().map(|r| r.len()), Some(1));
}
