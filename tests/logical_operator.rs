#[macro_use]
mod common;

#[cfg(test)]
mod logical_operator {
    tests! {
        or_returns_operand in logical_operator is OK
        "1"
        "1"
        "ok"
        "nil"
    }

    tests! {
        and_returns_operand in logical_operator is OK
        "nil"
        "2"
        "ok"
        "truthy"
    }

    tests! {
        short_circuit in logical_operator is OK
        "before"
        "before"
    }
}
