use sea_orm::sea_query::{Expr, Func, IntoColumnRef, LikeExpr, SimpleExpr};

/// `LOWER(column) LIKE %term%` with LIKE wildcards in `term` escaped.
/// `term` is expected to be lower-cased already. SQLite's `lower()` folds
/// ASCII only, so non-ASCII capitals in stored text match only on Postgres.
pub(crate) fn contains_ci(column: impl IntoColumnRef, term: &str) -> SimpleExpr {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(escaped).escape('\\'))
}
