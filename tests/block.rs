#[macro_use]
mod common;

#[cfg(test)]
mod block {
    tests! {
        nested_scopes in block is OK
        "inner"
        "outer"
        "global"
    }

    tests! {
        empty_block in block is OK
    }
}
