/// Invoke a macro once for every suffix of a list of type parameters, which gives one
/// invocation per tuple arity.
#[macro_export]
macro_rules! for_every_tuple {
    ($m:ident !! $head_ty:ident) => {
        $m!($head_ty);
    };
    ($m:ident !! $head_ty:ident, $($tail_ty:ident),*) => (
        $m!($head_ty, $( $tail_ty ),*);
        $crate::for_every_tuple!($m !! $( $tail_ty ),*);
    );
}

/// Apply a macro to every tuple arity from 1 to 26 (type parameters `A` to `Z`).
///
/// Used to implement [`IntoGroup`](crate::ecs::IntoGroup) for tuples of component types.
#[macro_export]
macro_rules! all_tuples {
    ($m:ident) => {
        $crate::for_every_tuple!($m !! A, B, C, D, E, F, G, H, I, J, K, L, M, N, O, P, Q, R, S, T, U, V, W, X, Y, Z);
    };
}

#[cfg(test)]
mod tests {
    trait Arity {
        fn arity() -> usize;
    }

    macro_rules! count_arity {
        ($($name: ident),*) => {
            impl<$($name),*> Arity for ($($name,)*) {
                fn arity() -> usize {
                    [$(stringify!($name)),*].len()
                }
            }
        }
    }

    all_tuples!(count_arity);

    #[test]
    fn implements_every_arity() {
        assert_eq!(<(u8,)>::arity(), 1);
        assert_eq!(<(u8, u16, u32)>::arity(), 3);
        assert_eq!(
            <(
                u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8,
                u8, u8, u8, u8, u8
            )>::arity(),
            26
        );
    }
}
