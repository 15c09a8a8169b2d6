use leptos::prelude::*;

use crate::components::node_mesh::{NodeMeshCanvas, Variant};

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="hero">
				<NodeMeshCanvas variant=Variant::Light fullscreen=true />
				<div class="hero-overlay">
					<h1>"Node Mesh"</h1>
					<p class="subtitle">
						"An ambient constellation that rewires itself around your cursor."
					</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}
