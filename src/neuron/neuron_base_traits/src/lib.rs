use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};


/// Derive macro to automatically implement the capability traits shared by
/// every model that implements `GridDynamics`, including `CurrentVoltage`,
/// `Timestep`, `IsSpiking`, `LastFiringTime`, and `GaussianFactor`
///
/// Expects the deriving struct to have a `state` field with a `v_m` member
/// as well as `dt`, `is_spiking`, `last_firing_time`, and `gaussian_params`
/// fields
#[proc_macro_derive(NeuronBase)]
pub fn derive_neuron_base_traits(input: TokenStream) -> TokenStream {
    // Parse the input tokens into a syntax tree
    let input = parse_macro_input!(input as DeriveInput);

    // Get the name of the struct we are deriving the trait for
    let name = input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    // Generate the implementation of the trait
    let expanded = quote! {
        impl #impl_generics CurrentVoltage for #name #ty_generics #where_clause {
            fn get_current_voltage(&self) -> f32 {
                self.state.v_m
            }
        }

        impl #impl_generics Timestep for #name #ty_generics #where_clause {
            fn get_dt(&self) -> f32 {
                self.dt
            }
        }

        impl #impl_generics IsSpiking for #name #ty_generics #where_clause {
            fn is_spiking(&self) -> bool {
                self.is_spiking
            }
        }

        impl #impl_generics LastFiringTime for #name #ty_generics #where_clause {
            fn set_last_firing_time(&mut self, step: Option<usize>) {
                self.last_firing_time = step;
            }

            fn get_last_firing_time(&self) -> Option<usize> {
                self.last_firing_time
            }
        }

        impl #impl_generics GaussianFactor for #name #ty_generics #where_clause {
            fn get_gaussian_factor(&self) -> f32 {
                crate::distribution::limited_distr(
                    self.gaussian_params.mean,
                    self.gaussian_params.std,
                    self.gaussian_params.min,
                    self.gaussian_params.max,
                )
            }
        }
    };

    TokenStream::from(expanded)
}
