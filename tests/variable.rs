#[macro_use]
mod common;

#[cfg(test)]
mod variable {
    tests! {
        define_and_print in variable is OK
        "1"
    }

    tests! {
        shadowing in variable is OK
        "2"
        "1"
    }

    tests! {
        assignment_returns_value in variable is OK
        "2"
        "2"
    }

    tests! {
        global_self_initializer in variable is OK
        "nil"
    }

    tests! {
        global_redefinition in variable is OK
        "2"
    }

    tests! {
        uninitialized_is_nil in variable is OK
        "nil"
    }

    tests! {
        undefined_global in variable is ERR(70)
        "[line 1:7] RuntimeError at 'missing': Undefined variable 'missing'"
    }

    tests! {
        assign_undefined in variable is ERR(70)
        "[line 1:1] RuntimeError at 'missing': Undefined variable 'missing'"
    }

    tests! {
        self_initializer_in_block in variable is ERR(65)
        "[line 2:11] ResolveError at 'a': Cannot read local variable in its own initializer"
    }

    tests! {
        duplicate_local in variable is ERR(65)
        "[line 3:7] ResolveError at 'a': A variable is already defined with name 'a' in this scope"
    }
}
